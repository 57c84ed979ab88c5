/// 当前 UTC 时间戳（秒）
pub fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}

/// 当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
