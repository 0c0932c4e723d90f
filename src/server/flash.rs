//! One-shot user messages carried to the next page in a cookie.

use super::error::log_write_error;
use crate::directory_store::{EntityKind, StoreResult};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

pub const FLASH_COOKIE: &str = "flash";

/// Stores `message` for the next page that reads it.
pub fn set_flash(jar: CookieJar, message: &str) -> CookieJar {
    let value = urlencoding::encode(message).into_owned();
    jar.add(
        Cookie::build((FLASH_COOKIE, value))
            .path("/")
            .same_site(SameSite::Lax),
    )
}

/// Reads the pending message, if any, and clears it.
pub fn take_flash(jar: CookieJar) -> (CookieJar, Option<String>) {
    let message = jar.get(FLASH_COOKIE).map(|cookie| {
        urlencoding::decode(cookie.value())
            .map(|decoded| decoded.into_owned())
            .unwrap_or_else(|_| cookie.value().to_string())
    });
    match message {
        Some(message) => {
            let expired = Cookie::build((FLASH_COOKIE, ""))
                .path("/")
                .expires(time::OffsetDateTime::now_utc() - time::Duration::days(1))
                .same_site(SameSite::Lax);
            (jar.add(expired), Some(message))
        }
        None => (jar, None),
    }
}

fn subject(entity: EntityKind, name: &str) -> String {
    if name.is_empty() {
        entity.to_string()
    } else {
        format!("{} {}", entity, name)
    }
}

/// e.g. `Venue The Musical Hop was successfully listed!`
pub fn success_message(entity: EntityKind, name: &str, done: &str) -> String {
    format!("{} was successfully {}!", subject(entity, name), done)
}

/// e.g. `An error occurred. Venue The Musical Hop could not be listed.`
pub fn failure_message(entity: EntityKind, name: &str, done: &str) -> String {
    format!(
        "An error occurred. {} could not be {}.",
        subject(entity, name),
        done
    )
}

/// Verbs used in the messages of one kind of write.
pub struct WriteVerbs {
    pub action: &'static str,
    pub done: &'static str,
    pub failed: &'static str,
}

pub const LISTED: WriteVerbs = WriteVerbs {
    action: "create",
    done: "listed",
    failed: "listed",
};

pub const UPDATED: WriteVerbs = WriteVerbs {
    action: "update",
    done: "updated",
    failed: "edited",
};

pub const DELETED: WriteVerbs = WriteVerbs {
    action: "delete",
    done: "deleted",
    failed: "deleted",
};

/// Logs the result of a write and leaves the matching message for the user.
pub fn flash_outcome<T>(
    jar: CookieJar,
    entity: EntityKind,
    name: &str,
    verbs: &WriteVerbs,
    result: &StoreResult<T>,
) -> CookieJar {
    let message = match result {
        Ok(_) => success_message(entity, name, verbs.done),
        Err(err) => {
            log_write_error(&format!("{} {}", verbs.action, entity), err);
            failure_message(entity, name, verbs.failed)
        }
    };
    set_flash(jar, &message)
}
