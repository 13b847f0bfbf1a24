use chrono_tz::Tz;
use strum::{Display, EnumIter, EnumString};

use crate::error::{Error, Result};

/// Timezone abbreviations printed in the NWS forecast table header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "UPPERCASE")]
pub enum TimezoneLabel {
    Akst,
    Akdt,
    Pst,
    Pdt,
    Mst,
    Mdt,
    Cst,
    Cdt,
    Est,
    Edt,
}

impl TimezoneLabel {
    /// Fixed-offset zone for the label.
    ///
    /// `Etc/GMT+N` means N hours *behind* UTC. Daylight labels map to their
    /// own fixed offset rather than a regional zone, since regions such as
    /// Arizona do not observe daylight time.
    pub fn gmt_zone(self) -> Tz {
        match self {
            TimezoneLabel::Akst => Tz::Etc__GMTPlus9,
            TimezoneLabel::Akdt => Tz::Etc__GMTPlus8,
            TimezoneLabel::Pst => Tz::Etc__GMTPlus8,
            TimezoneLabel::Pdt => Tz::Etc__GMTPlus7,
            TimezoneLabel::Mst => Tz::Etc__GMTPlus7,
            TimezoneLabel::Mdt => Tz::Etc__GMTPlus6,
            TimezoneLabel::Cst => Tz::Etc__GMTPlus6,
            TimezoneLabel::Cdt => Tz::Etc__GMTPlus5,
            TimezoneLabel::Est => Tz::Etc__GMTPlus5,
            TimezoneLabel::Edt => Tz::Etc__GMTPlus4,
        }
    }
}

/// Map a timezone abbreviation such as `PST` to its fixed-offset zone
pub fn tz_to_gmt_offset(label: &str) -> Result<Tz> {
    label
        .trim()
        .parse::<TimezoneLabel>()
        .map(TimezoneLabel::gmt_zone)
        .map_err(|_| Error::UnknownTimezoneLabel(label.to_string()))
}
