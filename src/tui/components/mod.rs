pub mod confirm;
pub mod date_picker;
pub mod editor;
pub mod picker;
pub mod text_input;

pub use confirm::{ConfirmAction, ConfirmResult, ConfirmationModal};
pub use date_picker::{DatePicker, DatePickerResult};
pub use editor::{EditorField, EditorOverlay, EditorResult, TaskEditor};
pub use picker::{FuzzyPicker, PickerResult};
pub use text_input::{InputValidator, TextInput, TextInputResult, ValidationError};
