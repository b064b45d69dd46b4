use std::cmp::Ordering;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use uuid::Uuid;

/// A flat record type stored as a JSON document in a named collection.
///
/// Each collection has one secondary index key (section, category, date or
/// year-month) and a natural display order.
pub trait Collection: Serialize + DeserializeOwned + Send + 'static {
    const NAME: &'static str;

    fn id(&self) -> Uuid;
    fn set_id(&mut self, id: Uuid);
    fn index_key(&self) -> String;
    fn display_order(&self, other: &Self) -> Ordering;

    /// Field checks serde can't express. The message goes back to the admin.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// `HH:MM` on the wire. Parsing accepts an unpadded hour (`9:00`); output is
/// always padded.
mod hh_mm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
        match time {
            Some(t) => s.serialize_str(&t.format(FORMAT).to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
        match Option::<String>::deserialize(d)? {
            Some(raw) if !raw.trim().is_empty() => NaiveTime::parse_from_str(raw.trim(), FORMAT)
                .map(Some)
                .map_err(|_| D::Error::custom(format!("invalid time '{raw}', expected HH:MM"))),
            _ => Ok(None),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqItem {
    #[serde(default)]
    pub id: Uuid,
    pub section: String,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub sort_order: i32,
}

impl Collection for FaqItem {
    const NAME: &'static str = "faq";

    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn index_key(&self) -> String {
        self.section.clone()
    }

    fn display_order(&self, other: &Self) -> Ordering {
        self.section
            .cmp(&other.section)
            .then(self.sort_order.cmp(&other.sort_order))
            .then_with(|| self.question.cmp(&other.question))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleItem {
    #[serde(default)]
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    /// `YYYY-MM-DD`
    pub date: chrono::NaiveDate,
    /// 24-hour clock.
    #[serde(default, with = "hh_mm")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "hh_mm")]
    pub end_time: Option<NaiveTime>,
    pub image: Option<String>,
}

impl Collection for ScheduleItem {
    const NAME: &'static str = "schedule";

    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn index_key(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    fn display_order(&self, other: &Self) -> Ordering {
        // Untimed entries sort after timed ones on the same day.
        let start = |item: &Self| (item.start_time.is_none(), item.start_time);
        self.date
            .cmp(&other.date)
            .then_with(|| start(self).cmp(&start(other)))
            .then_with(|| self.title.cmp(&other.title))
    }

    fn validate(&self) -> Result<(), String> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) if end < start => Err("endTime is before startTime".into()),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryItem {
    #[serde(default)]
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub year: i32,
    pub month: u32,
    pub image: Option<String>,
}

impl StoryItem {
    pub fn year_month_key(year: i32, month: u32) -> String {
        format!("{:04}-{:02}", year, month)
    }
}

impl Collection for StoryItem {
    const NAME: &'static str = "story";

    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn index_key(&self) -> String {
        Self::year_month_key(self.year, self.month)
    }

    fn display_order(&self, other: &Self) -> Ordering {
        (self.year, self.month)
            .cmp(&(other.year, other.month))
            .then_with(|| self.title.cmp(&other.title))
    }

    fn validate(&self) -> Result<(), String> {
        if (1..=12).contains(&self.month) {
            Ok(())
        } else {
            Err(format!("month must be 1-12, got {}", self.month))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryItem {
    #[serde(default)]
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub url: String,
    pub image: Option<String>,
    pub category: String,
    #[serde(default)]
    pub sort_order: i32,
}

impl Collection for RegistryItem {
    const NAME: &'static str = "registry";

    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn index_key(&self) -> String {
        self.category.clone()
    }

    fn display_order(&self, other: &Self) -> Ordering {
        self.category
            .cmp(&other.category)
            .then(self.sort_order.cmp(&other.sort_order))
            .then_with(|| self.name.cmp(&other.name))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelItem {
    #[serde(default)]
    pub id: Uuid,
    pub category: String,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub url: Option<String>,
    pub image: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
}

impl Collection for TravelItem {
    const NAME: &'static str = "travel";

    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn index_key(&self) -> String {
        self.category.clone()
    }

    fn display_order(&self, other: &Self) -> Ordering {
        self.category
            .cmp(&other.category)
            .then(self.sort_order.cmp(&other.sort_order))
            .then_with(|| self.name.cmp(&other.name))
    }
}
