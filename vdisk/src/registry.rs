use crate::VDiskError;
use log::warn;

pub const SUPERUSER: &str = "root";
pub const USERS_FILE: &str = "users.txt";
/// Content of `users.txt` on a freshly formatted partition.
pub const DEFAULT_USERS: &str = "1,G,root\n1,U,root,root,root\n";
/// Longest accepted username, password or group name.
pub const MAX_FIELD_LEN: usize = 10;
/// Rows are never deleted, their id is set to this instead.
pub const REMOVED_ID: u32 = 0;

const GROUP_KIND: &str = "G";
const USER_KIND: &str = "U";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: u32,
    pub name: String,
}

impl Group {
    pub fn is_active(&self) -> bool {
        return self.id != REMOVED_ID;
    }
}

/// A user row. The id of a user row is the id of its group, so removing the group removes its users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub group: Group,
    pub username: String,
    pub password: String,
}

impl User {
    pub fn is_active(&self) -> bool {
        return self.group.is_active();
    }
}

/// The groups and users of one partition, kept in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    groups: Vec<Group>,
    users: Vec<User>,
}

fn check_field<E>(value: &str) -> Result<(), VDiskError<E>> {
    if value.is_empty()
        || value.len() > MAX_FIELD_LEN
        || value.contains(',')
        || value.contains('\n')
    {
        return Err(VDiskError::InvalidName(String::from(value)));
    }

    return Ok(());
}

impl Registry {
    /// Parses `users.txt`. Malformed rows are skipped.
    pub fn parse(text: &str) -> Self {
        let mut registry = Self::default();

        for line in text.lines() {
            let line = line.trim();

            if line.is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split(',').map(|f| f.trim()).collect();

            if fields.len() < 3 {
                warn!("[USERS] skipping short row '{}'", line);
                continue;
            }

            let id = match fields[0].parse::<u32>() {
                Ok(id) => id,
                Err(_) => {
                    warn!("[USERS] skipping row with bad id '{}'", line);
                    continue;
                }
            };

            match (fields[1], fields.len()) {
                (GROUP_KIND, 3) => registry.groups.push(Group {
                    id,
                    name: String::from(fields[2]),
                }),
                (USER_KIND, 5) => registry.users.push(User {
                    group: Group {
                        id,
                        name: String::from(fields[2]),
                    },
                    username: String::from(fields[3]),
                    password: String::from(fields[4]),
                }),
                _ => warn!("[USERS] skipping unknown row '{}'", line),
            }
        }

        return registry;
    }

    /// Renders the registry: groups by ascending id, each followed by its users, then users whose group is gone.
    pub fn to_text(&self) -> String {
        let mut groups = self.groups.clone();
        groups.sort_by_key(|g| g.id);

        let mut text = String::new();

        for group in groups.iter() {
            text.push_str(&format!("{},{},{}\n", group.id, GROUP_KIND, group.name));

            if !group.is_active() {
                continue;
            }

            let mut seen: Vec<&str> = Vec::new();

            for user in self.users.iter().filter(|u| u.group.id == group.id) {
                if seen.contains(&user.username.as_str()) {
                    continue;
                }

                seen.push(&user.username);
                text.push_str(&Self::user_row(user));
            }
        }

        for user in self.users.iter().filter(|u| !u.is_active()) {
            text.push_str(&Self::user_row(user));
        }

        return text;
    }

    fn user_row(user: &User) -> String {
        return format!(
            "{},{},{},{},{}\n",
            user.group.id, USER_KIND, user.group.name, user.username, user.password
        );
    }

    pub fn groups(&self) -> &[Group] {
        return &self.groups;
    }

    pub fn users(&self) -> &[User] {
        return &self.users;
    }

    pub fn active_group(&self, name: &str) -> Option<&Group> {
        return self.groups.iter().find(|g| g.is_active() && g.name == name);
    }

    pub fn active_user(&self, username: &str) -> Option<&User> {
        return self
            .users
            .iter()
            .find(|u| u.is_active() && u.username == username);
    }

    pub fn authenticate(&self, username: &str, password: &str) -> bool {
        return match self.active_user(username) {
            Some(user) => user.password == password,
            None => false,
        };
    }

    fn next_group_id(&self) -> u32 {
        let largest = self.groups.iter().map(|g| g.id).max().unwrap_or(0);

        return core::cmp::max(largest, self.groups.len() as u32) + 1;
    }

    pub fn add_group<E>(&mut self, name: &str) -> Result<u32, VDiskError<E>> {
        check_field::<E>(name)?;

        if self.active_group(name).is_some() {
            return Err(VDiskError::AlreadyActive(String::from(name)));
        }

        let id = self.next_group_id();
        self.groups.push(Group {
            id,
            name: String::from(name),
        });

        return Ok(id);
    }

    /// Soft deletes the group and every user in it.
    pub fn remove_group<E>(&mut self, name: &str) -> Result<(), VDiskError<E>> {
        let group = match self
            .groups
            .iter_mut()
            .find(|g| g.is_active() && g.name == name)
        {
            Some(group) => group,
            None => return Err(VDiskError::GroupNotFound(String::from(name))),
        };

        let id = group.id;
        group.id = REMOVED_ID;

        for user in self.users.iter_mut().filter(|u| u.group.id == id) {
            user.group.id = REMOVED_ID;
        }

        return Ok(());
    }

    pub fn add_user<E>(
        &mut self,
        username: &str,
        password: &str,
        group: &str,
    ) -> Result<(), VDiskError<E>> {
        check_field::<E>(username)?;
        check_field::<E>(password)?;
        check_field::<E>(group)?;

        if self.active_user(username).is_some() {
            return Err(VDiskError::AlreadyActive(String::from(username)));
        }

        let group = match self.active_group(group) {
            Some(group) => group.clone(),
            None => return Err(VDiskError::GroupNotFound(String::from(group))),
        };

        self.users.push(User {
            group,
            username: String::from(username),
            password: String::from(password),
        });

        return Ok(());
    }

    pub fn remove_user<E>(&mut self, username: &str) -> Result<(), VDiskError<E>> {
        return match self
            .users
            .iter_mut()
            .find(|u| u.is_active() && u.username == username)
        {
            Some(user) => {
                user.group.id = REMOVED_ID;
                Ok(())
            }
            None => Err(VDiskError::UserNotFound(String::from(username))),
        };
    }

    pub fn change_group<E>(&mut self, username: &str, group: &str) -> Result<(), VDiskError<E>> {
        let group = match self.active_group(group) {
            Some(group) => group.clone(),
            None => return Err(VDiskError::GroupNotFound(String::from(group))),
        };

        return match self
            .users
            .iter_mut()
            .find(|u| u.is_active() && u.username == username)
        {
            Some(user) => {
                user.group = group;
                Ok(())
            }
            None => Err(VDiskError::UserNotFound(String::from(username))),
        };
    }
}
