pub mod base_list;
pub mod confirm_dialog;
pub mod history;
pub mod menu;
pub mod progress_bar;
pub mod quiz_view;
pub mod results;
pub mod setup_form;
