/*!
    DASH-IF CPIX (Content Protection Information Exchange) document model.

    Write direction for the whole document, plus reading of key periods.
*/

mod content_key;
mod document;
mod drm_system;
mod error;
mod period;
mod usage_rule;
mod xml;

pub use self::content_key::ContentKey;
pub use self::document::Cpix;
pub use self::drm_system::DrmSystem;
pub use self::error::{CpixError, CpixResult};
pub use self::period::{Period, PeriodList, PeriodTiming};
pub use self::usage_rule::{
    AudioFilter, BitrateFilter, Filter, KeyPeriodFilter, LabelFilter, UsageRule, VideoFilter,
};
pub use self::xml::{CPIX_NS, PSKC_NS, XSI_NS};
