//! Ready-made users for tests.

use chrono::NaiveDate;

use dscommerce_core::UserId;

use crate::{Role, User};

/// BCrypt hash of "123456".
pub const PASSWORD_HASH: &str = "$2a$10$N7SkKCa3r17ga.i.dF9iy.BFUBL2n3b6Z1CWSZWi/qy7ABq/E6VpO";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

pub fn client_user() -> User {
    let mut user = User::new(
        UserId::new(1),
        "Maria",
        "maria@gmail.com",
        "3495929193",
        date(2001, 7, 25),
        PASSWORD_HASH,
    );
    user.add_role(Role::client());
    user
}

pub fn admin_user() -> User {
    let mut user = User::new(
        UserId::new(2),
        "Alex",
        "alex@gmail.com",
        "349295653",
        date(1987, 12, 13),
        PASSWORD_HASH,
    );
    user.add_role(Role::admin());
    user
}

pub fn custom_admin_user(id: UserId, name: impl Into<String>) -> User {
    let mut user = User::new(
        id,
        name,
        "alex@gmail.com",
        "349295653",
        date(1987, 12, 13),
        PASSWORD_HASH,
    );
    user.add_role(Role::admin());
    user
}

pub fn custom_client_user(id: UserId, name: impl Into<String>) -> User {
    let mut user = User::new(
        id,
        name,
        "maria@gmail.com",
        "349295653",
        date(1987, 12, 13),
        PASSWORD_HASH,
    );
    user.add_role(Role::client());
    user
}
