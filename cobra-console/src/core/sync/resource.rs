//! Resource trait - one implementation per mirrored collection

use std::fmt::{Debug, Display};
use std::hash::Hash;

use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::client::UserInfo;
use validator::Validate;

use crate::core::error::{ConsoleError, ConsoleResult};

/// A remote collection the console mirrors.
///
/// The collection lives at `ENDPOINT` (`GET`/`POST`), single items at
/// [`Resource::item_path`] (`PUT`/`DELETE`).
pub trait Resource: Clone + Debug + DeserializeOwned + Send + Sync + 'static {
    /// Server-assigned identifier, immutable after creation
    type Id: Clone + Eq + Hash + Display + Debug + Send + Sync + 'static;
    /// Create/update body
    type Payload: Serialize + Validate + Send + Sync;
    /// Closed status enumeration, used by the list filter
    type Status: Copy + Eq + Display + Send + Sync;

    /// Collection path relative to the API base, with trailing slash
    const ENDPOINT: &'static str;
    /// Singular name used in logs and messages
    const LABEL: &'static str;

    fn id(&self) -> Self::Id;

    fn status(&self) -> Self::Status;

    /// Fields matched by the list search box
    fn search_text(&self) -> Vec<&str>;

    fn item_path(id: &Self::Id) -> String {
        format!("{}{}/", Self::ENDPOINT, id)
    }

    /// Required fields are checked here, before any request is sent.
    fn validate(payload: &Self::Payload) -> ConsoleResult<()> {
        payload.validate().map_err(ConsoleError::from_validation)
    }

    /// Deletions the console refuses outright for `operator`, checked
    /// before confirmation.
    fn check_delete(&self, _operator: Option<&UserInfo>) -> ConsoleResult<()> {
        Ok(())
    }
}

/// Operator confirmation for an irreversible delete.
///
/// Any `Fn(&T) -> bool` works; a dialog-backed host implements it on its
/// own type.
pub trait ConfirmDelete<T> {
    fn confirm(&self, item: &T) -> bool;
}

impl<T, F> ConfirmDelete<T> for F
where
    F: Fn(&T) -> bool,
{
    fn confirm(&self, item: &T) -> bool {
        self(item)
    }
}
