use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
pub enum Status {
    OnDuty,
    #[default]
    OffDuty,
}

impl Status {
    pub const ON_DUTY_LABEL: &'static str = "en service";
    pub const OFF_DUTY_LABEL: &'static str = "hors service";

    /// Convert enum → stored string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Status::OnDuty => Self::ON_DUTY_LABEL,
            Status::OffDuty => Self::OFF_DUTY_LABEL,
        }
    }

    /// Convert stored string → enum.
    /// Only the two fixed labels are accepted; surrounding blanks are ignored.
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.trim() {
            Self::ON_DUTY_LABEL => Some(Status::OnDuty),
            Self::OFF_DUTY_LABEL => Some(Status::OffDuty),
            _ => None,
        }
    }

    pub fn is_on_duty(&self) -> bool {
        matches!(self, Status::OnDuty)
    }

    pub fn is_off_duty(&self) -> bool {
        matches!(self, Status::OffDuty)
    }

    /// The status a toggle moves to.
    pub fn flipped(self) -> Self {
        match self {
            Status::OnDuty => Status::OffDuty,
            Status::OffDuty => Status::OnDuty,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_and_reject_unknown() {
        assert_eq!(Status::from_db_str(" en service "), Some(Status::OnDuty));
        assert_eq!(Status::from_db_str("hors service"), Some(Status::OffDuty));
        assert_eq!(Status::from_db_str("En Service"), None);
        assert_eq!(Status::from_db_str(""), None);
        assert_eq!(Status::default(), Status::OffDuty);
    }
}
