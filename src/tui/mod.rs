pub mod draw;
pub mod events;
pub mod input;
pub mod state;

pub use draw::render_to_buffer;
pub use events::run;
pub use input::{handle_text_input_key, TextInput};
pub use state::{App, EditorFocus, SettingsFocus, SettingsPanel, EMPTY_INPUT_ERROR};
