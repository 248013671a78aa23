use uuid::Uuid;

/// A fresh experience/education id. Random v4 UUIDs, so an id handed out once is
/// never produced again, including for records that were later removed.
pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}
