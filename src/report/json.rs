use crate::types::record::{History, UserRecord};
use serde::Serialize;

#[derive(Serialize)]
struct HistoryReport<'a> {
    user: &'a str,
    name: &'a str,
    guest: bool,
    history: &'a History,
}

pub fn to_json(user: &UserRecord) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&HistoryReport {
        user: &user.id,
        name: &user.name,
        guest: user.is_guest,
        history: &user.history,
    })
}
