//! Holiday insights - anticipating spend around upcoming holidays
//!
//! Looks at past occurrences of each upcoming holiday, measures how much the
//! user spent in the days leading up to it compared with their usual daily
//! spend, and recommends a pre-adjustment graded by how much history backs it.
//!
//! ## Pieces
//!
//! - **Generator** - per-holiday analysis and recommendation
//! - **Windows** - calendar-day window arithmetic and daily expense index
//! - **Cache** - per-user memo of computed insight lists
//!
//! ## Usage
//!
//! ```rust,ignore
//! use almanac_core::insights::{HolidayInsightGenerator, InsightRequest};
//!
//! let generator = HolidayInsightGenerator::new(config.insights.clone());
//! let insights = generator.generate(&ledger, &calendar, &InsightRequest::new(as_of))?;
//! ```

pub mod cache;
pub mod generator;
pub mod types;
pub mod windows;

pub use cache::{CacheKey, InsightCache};
pub use generator::HolidayInsightGenerator;
pub use types::{Confidence, HolidayInsight, InsightRequest, InsightStatus, TopCategory};
