use std::collections::HashMap;

use aisle_types::models::{Guest, GuestType};

use crate::address::parse_address;

pub const RAW_HEADER: [&str; 13] = [
    "Full Name",
    "Email",
    "Guest Type",
    "Attendance Status",
    "Food Choice",
    "Dietary Restrictions",
    "Song Requests",
    "Bridal Party",
    "Bridal Party Role",
    "Drinking Age",
    "Address",
    "Created At",
    "Updated At",
];

const IMPORT_BASE_HEADER: [&str; 7] = [
    "Name",
    "Email",
    "Street Address",
    "City",
    "State",
    "Zip Code",
    "Plus One",
];

/// Standard CSV quoting: fields holding a comma, quote or line break are
/// wrapped in quotes with inner quotes doubled. Everything else is untouched.
pub fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn push_row<S: AsRef<str>>(out: &mut String, fields: &[S]) {
    let line: Vec<String> = fields.iter().map(|f| escape_field(f.as_ref())).collect();
    out.push_str(&line.join(","));
    out.push('\n');
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

/// One row per guest with a fixed 13-column header.
pub fn raw_csv(guests: &[Guest]) -> String {
    let mut out = String::new();
    push_row(&mut out, &RAW_HEADER);

    for g in guests {
        let row = [
            g.full_name.clone(),
            g.email.clone(),
            g.guest_type.to_string(),
            g.attendance_status.to_string(),
            g.food_choice.map(|f| f.to_string()).unwrap_or_default(),
            g.dietary_restrictions.clone().unwrap_or_default(),
            g.song_requests.clone().unwrap_or_default(),
            yes_no(g.is_bridal_party).to_string(),
            g.bridal_party_role.clone().unwrap_or_default(),
            yes_no(g.is_of_drinking_age).to_string(),
            g.address.clone().unwrap_or_default(),
            g.created_at.to_rfc3339(),
            g.updated_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
        ];
        push_row(&mut out, &row);
    }

    out
}

/// A party laid out for the import sheet: the main contact, the plus one,
/// and everyone else in party-list order.
#[derive(Debug, PartialEq)]
pub struct PartyRow<'a> {
    pub primary: &'a Guest,
    pub plus_one: Option<&'a Guest>,
    pub additional: Vec<&'a Guest>,
}

impl PartyRow<'_> {
    pub fn size(&self) -> usize {
        1 + usize::from(self.plus_one.is_some()) + self.additional.len()
    }
}

/// Groups guests by email in first-seen order. Each group's PRIMARY guest
/// (or its first member when none is marked) heads the row.
pub fn group_parties(guests: &[Guest]) -> Vec<PartyRow<'_>> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&Guest>> = HashMap::new();
    for g in guests {
        let members = groups.entry(g.email.as_str()).or_default();
        if members.is_empty() {
            order.push(g.email.as_str());
        }
        members.push(g);
    }

    order
        .into_iter()
        .filter_map(|email| groups.remove(email))
        .filter_map(|mut members| {
            if members.is_empty() {
                return None;
            }
            let head = members
                .iter()
                .position(|g| g.guest_type == GuestType::Primary)
                .unwrap_or(0);
            let primary = members.remove(head);
            let mut rest = members.into_iter();
            Some(PartyRow {
                primary,
                plus_one: rest.next(),
                additional: rest.collect(),
            })
        })
        .collect()
}

/// Party-grouped sheet for a third-party guest list importer. The trailing
/// "Additional Guest N" columns are sized to the largest party.
pub fn import_csv(guests: &[Guest]) -> String {
    let parties = group_parties(guests);
    let extra_columns = parties
        .iter()
        .map(|p| p.additional.len())
        .max()
        .unwrap_or(0);

    let mut header: Vec<String> = IMPORT_BASE_HEADER.iter().map(|h| h.to_string()).collect();
    header.extend((1..=extra_columns).map(|n| format!("Additional Guest {n}")));

    let mut out = String::new();
    push_row(&mut out, &header);

    for party in &parties {
        let address = parse_address(party.primary.address.as_deref().unwrap_or_default());
        let mut row = vec![
            title_case(&party.primary.full_name),
            party.primary.email.clone(),
            address.street,
            address.city,
            address.state,
            address.zip,
            party.plus_one.map(|g| title_case(&g.full_name)).unwrap_or_default(),
        ];
        row.extend(party.additional.iter().map(|g| title_case(&g.full_name)));
        row.resize(header.len(), String::new());
        push_row(&mut out, &row);
    }

    out
}

/// Names are stored lower-cased; this restores a presentable form.
pub fn title_case(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            word.split_inclusive(['-', '\''])
                .map(|part| {
                    let mut chars = part.chars();
                    match chars.next() {
                        Some(first) => first.to_uppercase().chain(chars).collect(),
                        None => String::new(),
                    }
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(" ")
}
