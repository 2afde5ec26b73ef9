mod dialog;
pub use dialog::LocationDialog;

mod map_picker;
pub use map_picker::{embed_url, MapPicker};
