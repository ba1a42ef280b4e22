pub mod health;
pub mod history;
pub mod stream;
pub mod uptime;

macros_utils::routes! {
    mod health,
    mod stream,
    mod history,
    mod uptime,
}
