// Every inode addresses its content through 15 pointers: 12 direct, then a single, double and
// triple indirect tree of pointer blocks. Reads and writes go through the two walkers below,
// which recurse over (block index, levels of pointer blocks left).

use super::Filesystem;
use crate::disk::disk_blocks::{
    FileBlock, FolderBlock, FolderEntry, Inode, PointerBlock, BLOCK_SIZE, POINTERS_PER_BLOCK,
    POINTER_COUNT,
};
use crate::{VDiskError, VDiskErrorConvertible};

type Visit<'f, T, E> = dyn FnMut(&T, i32) -> Result<bool, VDiskError<E>> + 'f;
type Fill<'f, T, E> = dyn FnMut(&mut T, &mut i32) -> Result<bool, VDiskError<E>> + 'f;

impl<'a, 'b, E: VDiskErrorConvertible> Filesystem<'a, 'b, E> {
    /// Calls `visit` with every allocated leaf block in order. Stops early once `visit` returns true.
    fn walk_tree(
        &self,
        pointer: i32,
        depth: u32,
        visit: &mut Visit<'_, Self, E>,
    ) -> Result<bool, VDiskError<E>> {
        if pointer == -1 {
            return Ok(false);
        }

        if depth == 0 {
            return visit(self, pointer);
        }

        let node: PointerBlock = self.read_block(pointer)?;

        for child in node.pointers.iter() {
            if self.walk_tree(*child, depth - 1, visit)? {
                return Ok(true);
            }
        }

        return Ok(false);
    }

    fn walk_inode(
        &self,
        inode: &Inode,
        visit: &mut Visit<'_, Self, E>,
    ) -> Result<bool, VDiskError<E>> {
        for slot in 0..POINTER_COUNT {
            if self.walk_tree(inode.blocks[slot], Inode::depth_of(slot), visit)? {
                return Ok(true);
            }
        }

        return Ok(false);
    }

    /// Offers leaf slots to `fill` in order until it returns true, allocating pointer blocks on the way down.
    /// A pointer block is written back only if one of its slots changed.
    fn fill_tree(
        &mut self,
        pointer: &mut i32,
        depth: u32,
        fill: &mut Fill<'_, Self, E>,
    ) -> Result<bool, VDiskError<E>> {
        if depth == 0 {
            return fill(self, pointer);
        }

        let index;
        let mut node;

        if *pointer == -1 {
            node = PointerBlock::new();
            index = self.allocate_block(&node)?;
            *pointer = index;
        } else {
            index = *pointer;
            node = self.read_block::<PointerBlock>(index)?;
        }

        let original = node;
        let mut done = false;

        for i in 0..POINTERS_PER_BLOCK {
            if self.fill_tree(&mut node.pointers[i], depth - 1, fill)? {
                done = true;
                break;
            }
        }

        if node != original {
            self.write_block(index, &node)?;
        }

        return Ok(done);
    }

    fn fill_inode(
        &mut self,
        inode: &mut Inode,
        fill: &mut Fill<'_, Self, E>,
    ) -> Result<bool, VDiskError<E>> {
        for slot in 0..POINTER_COUNT {
            let mut pointer = inode.blocks[slot];
            let done = self.fill_tree(&mut pointer, Inode::depth_of(slot), fill)?;
            inode.blocks[slot] = pointer;

            if done {
                return Ok(true);
            }
        }

        return Ok(false);
    }

    /// Concatenates the file blocks of an inode. The result is not yet cut to the inode size.
    pub(crate) fn read_content(&self, inode: &Inode) -> Result<Vec<u8>, VDiskError<E>> {
        let mut content = Vec::new();

        self.walk_inode(inode, &mut |fs, index| {
            let block: FileBlock = fs.read_block(index)?;
            content.extend_from_slice(&block.content);
            return Ok(false);
        })?;

        return Ok(content);
    }

    /// Stores `content` in 64 byte blocks, direct pointers first. Existing blocks are overwritten in place.
    pub(crate) fn write_content(
        &mut self,
        inode: &mut Inode,
        content: &[u8],
    ) -> Result<(), VDiskError<E>> {
        let mut remaining = content;

        let done = self.fill_inode(inode, &mut |fs, pointer| {
            if remaining.is_empty() {
                return Ok(true);
            }

            let take = core::cmp::min(remaining.len(), BLOCK_SIZE as usize);
            let block = FileBlock::from_chunk(&remaining[..take]);

            if *pointer == -1 {
                *pointer = fs.allocate_block(&block)?;
            } else {
                fs.write_block(*pointer, &block)?;
            }

            remaining = &remaining[take..];

            return Ok(remaining.is_empty());
        })?;

        if !done {
            return Err(VDiskError::NoFreeBlocks);
        }

        return Ok(());
    }

    /// Adds a directory entry in the first free slot, allocating folder blocks as needed.
    pub(crate) fn insert_entry(
        &mut self,
        directory: &mut Inode,
        links: (i32, i32),
        entry: FolderEntry,
    ) -> Result<(), VDiskError<E>> {
        let inserted = self.fill_inode(directory, &mut |fs, pointer| {
            if *pointer == -1 {
                let mut block = FolderBlock::new(links.0, links.1);
                block.insert(entry);
                *pointer = fs.allocate_block(&block)?;

                return Ok(true);
            }

            let mut block: FolderBlock = fs.read_block(*pointer)?;

            if !block.insert(entry) {
                return Ok(false);
            }

            fs.write_block(*pointer, &block)?;

            return Ok(true);
        })?;

        if !inserted {
            return Err(VDiskError::NoFreeBlocks);
        }

        return Ok(());
    }

    pub(crate) fn find_entry(
        &self,
        directory: &Inode,
        name: &str,
    ) -> Result<Option<i32>, VDiskError<E>> {
        let mut found = None;

        self.walk_inode(directory, &mut |fs, index| {
            let block: FolderBlock = fs.read_block(index)?;
            found = block.find(name);
            return Ok(found.is_some());
        })?;

        return Ok(found);
    }

    pub(crate) fn entries(&self, directory: &Inode) -> Result<Vec<FolderEntry>, VDiskError<E>> {
        let mut entries = Vec::new();

        self.walk_inode(directory, &mut |fs, index| {
            let block: FolderBlock = fs.read_block(index)?;
            entries.extend(block.children().copied());
            return Ok(false);
        })?;

        return Ok(entries);
    }

    /// The "." and ".." indices recorded in a directory's first folder block.
    pub(crate) fn links_of(
        &self,
        index: i32,
        directory: &Inode,
    ) -> Result<(i32, i32), VDiskError<E>> {
        if directory.blocks[0] == -1 {
            return Ok((index, index));
        }

        let block: FolderBlock = self.read_block(directory.blocks[0])?;

        return Ok(block.links());
    }
}
