use chrono::{DateTime, Duration, FixedOffset, Months, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Date range selection from the history toolbar.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DateFilter {
    #[default]
    All,
    Today,
    /// Last 7 days, counted from the start of today
    Week,
    /// Last calendar month, counted from the start of today
    Month,
    /// Inclusive on both ends; `to` covers its whole day
    Custom {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
}

impl DateFilter {
    pub fn is_active(&self) -> bool {
        !matches!(self, DateFilter::All)
    }

    /// `now` carries the user's UTC offset, which defines calendar days.
    pub fn matches(&self, created_at: Option<DateTime<Utc>>, now: DateTime<FixedOffset>) -> bool {
        if !self.is_active() {
            return true;
        }
        let Some(created_at) = created_at else {
            return false;
        };

        let offset = *now.offset();
        let local = created_at.with_timezone(&offset);
        let today = now.date_naive();

        match self {
            DateFilter::All => true,
            DateFilter::Today => local.date_naive() == today,
            DateFilter::Week => {
                start_of_day(today, offset).is_some_and(|start| local >= start - Duration::days(7))
            }
            DateFilter::Month => start_of_day(today, offset)
                .and_then(|start| start.checked_sub_months(Months::new(1)))
                .is_some_and(|start| local >= start),
            DateFilter::Custom { from, to } => {
                let day = local.date_naive();
                from.map_or(true, |from| day >= from) && to.map_or(true, |to| day <= to)
            }
        }
    }
}

fn start_of_day(day: NaiveDate, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    offset
        .from_local_datetime(&day.and_time(NaiveTime::MIN))
        .single()
}
