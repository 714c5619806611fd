//! Shopper-facing notices emitted by cart operations.
//!
//! Every failed operation and every newly added product produces exactly
//! one [`Notice`], delivered through the store's [`Notifier`].

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

/// Text shown when a requested quantity exceeds stock.
pub const OUT_OF_STOCK: &str = "Requested quantity is out of stock";
/// Text shown when adding a product fails for any other reason.
pub const ADD_FAILED: &str = "Error adding product";
/// Text shown when removing a product fails.
pub const REMOVE_FAILED: &str = "Error removing product";
/// Text shown when changing a product's amount fails for any other reason.
pub const UPDATE_FAILED: &str = "Error updating product amount";

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Which condition produced a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeCode {
    /// A new product line was added.
    ProductAdded,
    /// Adding one more unit would exceed stock.
    OutOfStockOnAdd,
    /// The requested amount exceeds stock.
    OutOfStockOnUpdate,
    /// Adding failed because a lookup or the durable write failed.
    AddFailed,
    /// The product to remove is not in the cart, or the durable write failed.
    RemoveFailed,
    /// Updating failed because a lookup or the durable write failed.
    UpdateFailed,
}

impl NoticeCode {
    pub fn level(&self) -> NoticeLevel {
        match self {
            NoticeCode::ProductAdded => NoticeLevel::Success,
            _ => NoticeLevel::Error,
        }
    }
}

/// A human-readable message for the shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub code: NoticeCode,
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(code: NoticeCode, message: impl Into<String>) -> Self {
        Self {
            code,
            level: code.level(),
            message: message.into(),
        }
    }

    /// Success notice naming the product that was added.
    pub fn product_added(title: &str) -> Self {
        Self::new(
            NoticeCode::ProductAdded,
            format!("{} was added to your cart!", title),
        )
    }

    pub fn out_of_stock_on_add() -> Self {
        Self::new(NoticeCode::OutOfStockOnAdd, OUT_OF_STOCK)
    }

    pub fn out_of_stock_on_update() -> Self {
        Self::new(NoticeCode::OutOfStockOnUpdate, OUT_OF_STOCK)
    }

    pub fn add_failed() -> Self {
        Self::new(NoticeCode::AddFailed, ADD_FAILED)
    }

    pub fn remove_failed() -> Self {
        Self::new(NoticeCode::RemoveFailed, REMOVE_FAILED)
    }

    pub fn update_failed() -> Self {
        Self::new(NoticeCode::UpdateFailed, UPDATE_FAILED)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Receives notices as operations finish.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Drops every notice.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _notice: Notice) {}
}

/// Keeps every notice in order, for callers that render them later.
#[derive(Debug, Default, Clone)]
pub struct NoticeLog {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    /// Remove and return everything recorded so far.
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock())
    }

    pub fn last(&self) -> Option<Notice> {
        self.notices.lock().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.notices.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.lock().is_empty()
    }
}

impl Notifier for NoticeLog {
    fn notify(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice)
    }
}
