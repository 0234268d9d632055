use serde::{Deserialize, Serialize};

/// 一個課程 section 在 catalog 回應中的樣子（單次輪詢有效）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSection {
    pub class_number: String,
    pub enrollment_cap: u64,
    pub enrollment_total: u64,
    pub seats_available: SeatCount,
}

impl ClassSection {
    pub fn from_enrollment(class_number: impl Into<String>, cap: u64, total: u64) -> Self {
        Self {
            class_number: class_number.into(),
            enrollment_cap: cap,
            enrollment_total: total,
            seats_available: SeatCount::from_enrollment(cap, total),
        }
    }

    pub fn has_open_seats(&self) -> bool {
        self.seats_available.is_open()
    }
}

/// Open seats, never negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeatCount(pub u64);

impl SeatCount {
    /// cap - total; 超收的 section 視為 0
    pub fn from_enrollment(cap: u64, total: u64) -> Self {
        Self(cap.saturating_sub(total))
    }

    pub fn is_open(&self) -> bool {
        self.0 > 0
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SeatCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    SeatsOpen { seats: SeatCount },
    Full,
    NotFound,
    /// 網路錯誤、非 2xx、JSON 壞掉；繼續輪詢
    Failed,
}

impl CheckOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, CheckOutcome::SeatsOpen { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub priority: String,
    pub tags: Vec<String>,
}

impl Notification {
    pub fn seats_open(title: &str, class_number: &str, seats: SeatCount) -> Self {
        Self {
            title: title.to_string(),
            message: format!(
                "FOUND IT! Class {} has {} seat(s) open. Enroll NOW!",
                class_number, seats
            ),
            priority: "high".to_string(),
            tags: vec!["mortar_board".to_string(), "rotating_light".to_string()],
        }
    }

    /// 401 提醒；tracker 不會停止
    pub fn token_rejected(title: &str, class_number: &str) -> Self {
        Self {
            title: title.to_string(),
            message: format!(
                "Token rejected (401) while checking Class {}. Still polling; refresh ASU_TOKEN.",
                class_number
            ),
            priority: "default".to_string(),
            tags: vec!["warning".to_string()],
        }
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = priority.into();
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_count_is_cap_minus_total() {
        assert_eq!(SeatCount::from_enrollment(80, 77), SeatCount(3));
        assert_eq!(SeatCount::from_enrollment(80, 80), SeatCount(0));
    }

    #[test]
    fn test_over_enrolled_section_has_zero_seats() {
        let section = ClassSection::from_enrollment("28482", 40, 43);
        assert_eq!(section.seats_available.get(), 0);
        assert!(!section.has_open_seats());
    }

    #[test]
    fn test_seats_open_message() {
        let n = Notification::seats_open("Class Seat Alert", "28482", SeatCount(2));
        assert_eq!(
            n.message,
            "FOUND IT! Class 28482 has 2 seat(s) open. Enroll NOW!"
        );
        assert_eq!(n.priority, "high");
        assert_eq!(n.tags, vec!["mortar_board", "rotating_light"]);
    }

    #[test]
    fn test_token_rejected_message() {
        let n = Notification::token_rejected("Class Seat Alert", "28482");
        assert!(n.message.starts_with("Token rejected (401)"));
        assert!(n.message.contains("Class 28482"));
        assert_eq!(n.tags, vec!["warning"]);
        assert_eq!(SeatCount(7).to_string(), "7");
    }
}
