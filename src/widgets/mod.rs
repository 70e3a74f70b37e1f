//! Reusable UI widgets.

pub mod text_input;
pub mod toast;

pub use text_input::TextInput;
pub use toast::{Toast, ToastManager, ToastVariant};
