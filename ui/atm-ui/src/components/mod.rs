pub mod account_panel;
pub mod amount_form;
pub mod connect;
pub mod layout;
pub mod notice;
