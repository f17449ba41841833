mod keyboard_view;
mod staff_view;

pub use keyboard_view::KeyboardView;
pub use staff_view::StaffView;
