//! Monthly duty report: placeholder data for up to nine employees plus a small
//! `{{key}}` / `{{#list}}...{{/list}}` renderer.

use super::ExportError;
use crate::calendar::{format_full, YearMonth};
use crate::schedule::{DayKind, MonthDuty};
use serde::Serialize;
use serde_json::{Map, Value};

pub const TEMPLATE_SLOTS: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateDate {
    pub date: String,
    pub weekday: String,
    pub weekend: String,
    pub weekday_hours: String,
    pub weekend_hours: String,
}

/// One employee column of the report. Zero tallies render blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TemplateSlot {
    pub name: String,
    pub personnel_number: String,
    pub dates: Vec<TemplateDate>,
    pub weekday_days: String,
    pub weekend_days: String,
    pub weekday_hours: String,
    pub weekend_hours: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateData {
    pub month: String,
    pub year: i32,
    pub slots: Vec<TemplateSlot>,
}

fn blank_if_zero(value: u32) -> String {
    if value == 0 {
        String::new()
    } else {
        value.to_string()
    }
}

impl TemplateData {
    /// Fills the slots from the month's tallies in catalog order; unused slots
    /// stay blank.
    pub fn from_month(month: &MonthDuty) -> Self {
        let mut slots: Vec<TemplateSlot> = month
            .tallies
            .iter()
            .take(TEMPLATE_SLOTS)
            .map(|tally| TemplateSlot {
                name: tally.employee.name.clone(),
                personnel_number: tally.employee.personnel_number.clone().unwrap_or_default(),
                dates: tally
                    .dates
                    .iter()
                    .map(|duty| {
                        let weekday = duty.kind == DayKind::Weekday;
                        let flag = |set: bool| if set { "1".to_string() } else { String::new() };
                        let hours = |set: bool| {
                            if set {
                                duty.hours().to_string()
                            } else {
                                String::new()
                            }
                        };
                        TemplateDate {
                            date: format_full(duty.date),
                            weekday: flag(weekday),
                            weekend: flag(!weekday),
                            weekday_hours: hours(weekday),
                            weekend_hours: hours(!weekday),
                        }
                    })
                    .collect(),
                weekday_days: blank_if_zero(tally.weekday_days),
                weekend_days: blank_if_zero(tally.weekend_days),
                weekday_hours: blank_if_zero(tally.weekday_hours),
                weekend_hours: blank_if_zero(tally.weekend_hours),
            })
            .collect();
        slots.resize_with(TEMPLATE_SLOTS, TemplateSlot::default);

        Self {
            month: month.period.name().to_lowercase(),
            year: month.period.year(),
            slots,
        }
    }

    /// Flat placeholder map: `month`, `year`, and per slot `i` the keys
    /// `name{i}`, `personnel{i}`, `dates{i}`, `weekday_days{i}`,
    /// `weekend_days{i}`, `weekday_hours{i}`, `weekend_hours{i}`.
    pub fn placeholders(&self) -> Result<Map<String, Value>, ExportError> {
        let mut map = Map::new();
        map.insert("month".to_string(), Value::String(self.month.clone()));
        map.insert("year".to_string(), Value::from(self.year));

        for (index, slot) in self.slots.iter().enumerate() {
            map.insert(format!("name{index}"), Value::String(slot.name.clone()));
            map.insert(
                format!("personnel{index}"),
                Value::String(slot.personnel_number.clone()),
            );
            map.insert(format!("dates{index}"), serde_json::to_value(&slot.dates)?);
            map.insert(
                format!("weekday_days{index}"),
                Value::String(slot.weekday_days.clone()),
            );
            map.insert(
                format!("weekend_days{index}"),
                Value::String(slot.weekend_days.clone()),
            );
            map.insert(
                format!("weekday_hours{index}"),
                Value::String(slot.weekday_hours.clone()),
            );
            map.insert(
                format!("weekend_hours{index}"),
                Value::String(slot.weekend_hours.clone()),
            );
        }

        Ok(map)
    }

    /// Suggested download name, e.g. `DutyReport_november_2025.txt`.
    pub fn file_name(period: YearMonth) -> String {
        format!(
            "DutyReport_{}_{}.txt",
            period.name().to_lowercase(),
            period.year()
        )
    }
}

/// Renders `source` against `data`. Unknown placeholders render empty;
/// sections iterate arrays, falling back to outer keys inside each item.
pub fn render_template(source: &str, data: &Map<String, Value>) -> Result<String, ExportError> {
    let mut out = String::with_capacity(source.len());
    render_into(source, &[data], &mut out)?;
    Ok(out)
}

fn render_into(
    source: &str,
    scopes: &[&Map<String, Value>],
    out: &mut String,
) -> Result<(), ExportError> {
    let mut rest = source;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];
        let close = after_open
            .find("}}")
            .ok_or_else(|| ExportError::TemplateSyntax("unterminated placeholder".to_string()))?;
        let tag = after_open[..close].trim();
        rest = &after_open[close + 2..];

        if let Some(name) = tag.strip_prefix('#') {
            let name = name.trim();
            let closing = format!("{{{{/{name}}}}}");
            let end = rest.find(&closing).ok_or_else(|| {
                ExportError::TemplateSyntax(format!("section '{name}' is never closed"))
            })?;
            let body = &rest[..end];
            rest = &rest[end + closing.len()..];

            match lookup(scopes, name) {
                Some(Value::Array(items)) => {
                    for item in items {
                        if let Value::Object(map) = item {
                            let mut inner = scopes.to_vec();
                            inner.push(map);
                            render_into(body, &inner, out)?;
                        } else {
                            render_into(body, scopes, out)?;
                        }
                    }
                }
                Some(value) if is_truthy(value) => render_into(body, scopes, out)?,
                _ => {}
            }
        } else if tag.starts_with('/') {
            return Err(ExportError::TemplateSyntax(format!(
                "unexpected closing tag '{tag}'"
            )));
        } else if let Some(value) = lookup(scopes, tag) {
            push_value(out, value);
        }
    }

    out.push_str(rest);
    Ok(())
}

fn lookup<'a>(scopes: &[&'a Map<String, Value>], key: &str) -> Option<&'a Value> {
    scopes.iter().rev().find_map(|scope| scope.get(key))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Number(_) | Value::Object(_) => true,
    }
}

fn push_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => {}
        Value::String(text) => out.push_str(text),
        Value::Bool(flag) => out.push_str(if *flag { "true" } else { "false" }),
        Value::Number(number) => out.push_str(&number.to_string()),
        other => out.push_str(&other.to_string()),
    }
}
