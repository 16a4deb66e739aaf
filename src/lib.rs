// Library root
// -----------
// This crate exposes the relay as a library; the binary (`main.rs`) wires
// it to the interactive menu.
//
// Module responsibilities:
// - `models`: request structures and their JSON wire shape.
// - `slots`: flattens the availability reply into a list of slots.
// - `config`: webhook URLs and client settings.
// - `api`: blocking HTTP transport behind the `Webhook` trait.
// - `relay`: the three operations (submit readings, fetch slots, confirm
//   slot) and the session state they share.
// - `ui`: terminal prompts that drive the relay.
pub mod api;
pub mod config;
pub mod models;
pub mod relay;
pub mod slots;
pub mod ui;
