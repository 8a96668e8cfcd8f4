//! Aggregation queries over the developer, user and review datasets.
//!
//! Every query answers with a JSON value. A query that matches nothing is a
//! normal answer of the form `{"Error": "..."}`; only a dataset that was never
//! loaded is reported as [`Error::DatasetUnavailable`].

use crate::catalog::canonical_id;
use crate::error::{Error, Result};
use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

pub const WELCOME_MESSAGE: &str = "PROYECTO INDIVIDUAL Nº1 --> agregue '/docs' a la url para continuar";

#[derive(Debug, Clone, Deserialize)]
pub struct DeveloperRelease {
    pub developer: String,
    pub price: String,
    pub year: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserSummary {
    pub user_id: String,
    #[serde(rename = "Dinero gastado")]
    pub money_spent: String,
    #[serde(rename = "Cantidad de items")]
    pub items_count: String,
    #[serde(rename = "% de recomendación")]
    pub recommend_pct: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserGenreHours {
    pub user_id: String,
    pub genres: String,
    pub year: String,
    #[serde(rename = "Horas jugadas")]
    pub hours: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeveloperYearScore {
    pub year: String,
    pub developer: String,
    #[serde(rename = "Recomendaciones")]
    pub recommendations: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeveloperSentiment {
    pub developer: String,
    pub sentiment: String,
    #[serde(rename = "Recuento de sentiment_analysis")]
    pub count: String,
}

/// Optional datasets; `None` means the file was not present at load time.
#[derive(Debug, Clone, Default)]
pub struct Analytics {
    pub developers: Option<Vec<DeveloperRelease>>,
    pub users: Option<Vec<UserSummary>>,
    pub user_genres: Option<Vec<UserGenreHours>>,
    pub best_developers: Option<Vec<DeveloperYearScore>>,
    pub developer_reviews: Option<Vec<DeveloperSentiment>>,
}

impl Analytics {
    /// Items released per year by developers matching `query`, with the share of free items.
    pub fn developer(&self, query: &str) -> Result<Value> {
        let rows = self.developers.as_deref().ok_or(Error::DatasetUnavailable("developer"))?;
        let cleaned = query.replace(',', ".").replace('"', "");
        let pattern = pattern(&cleaned, true);

        let mut per_year: BTreeMap<i64, (u64, u64)> = BTreeMap::new();
        let mut matched = false;
        for row in rows.iter().filter(|r| pattern.is_match(&r.developer)) {
            matched = true;
            let Some(year) = parse_year(&row.year) else { continue };
            let entry = per_year.entry(year).or_insert((0, 0));
            entry.0 += 1;
            if parse_number(&row.price) == Some(0.0) {
                entry.1 += 1;
            }
        }
        if !matched {
            return Ok(error_value("No se encontraron datos para el desarrollador especificado."));
        }

        let table: Vec<Value> = per_year
            .into_iter()
            .map(|(year, (total, free))| {
                let pct = round2(free as f64 / total as f64 * 100.0);
                json!({
                    "Año": year,
                    "Cantidad de Items": total,
                    "Contenido Free": format!("{}%", format_decimal(pct)),
                })
            })
            .collect();
        Ok(Value::Array(table))
    }

    pub fn userdata(&self, user_id: &str) -> Result<Value> {
        let rows = self.users.as_deref().ok_or(Error::DatasetUnavailable("userdata"))?;
        let Some(user) = rows.iter().find(|r| r.user_id == user_id) else {
            return Ok(error_value("Usuario no encontrado"));
        };
        Ok(json!({
            "user_id": user.user_id,
            "Dinero gastado": cell_value(&user.money_spent),
            "Cantidad de items": cell_value(&user.items_count),
            "% de recomendación": cell_value(&user.recommend_pct),
        }))
    }

    /// User with the most hours in `genre` and that user's hours per release year.
    pub fn user_for_genre(&self, genre: &str) -> Result<Value> {
        let rows = self.user_genres.as_deref().ok_or(Error::DatasetUnavailable("user_for_genre"))?;
        let pattern = pattern(genre, false);
        let matching: Vec<&UserGenreHours> = rows.iter().filter(|r| pattern.is_match(&r.genres)).collect();
        if matching.is_empty() {
            return Ok(error_value(&format!("No se encontraron datos para el género '{genre}'")));
        }

        let mut per_user: BTreeMap<&str, f64> = BTreeMap::new();
        for row in &matching {
            *per_user.entry(row.user_id.as_str()).or_insert(0.0) += parse_number(&row.hours).unwrap_or(0.0);
        }
        // strict comparison keeps the smallest user id on ties
        let mut top: Option<(&str, f64)> = None;
        for (user, hours) in per_user {
            if top.map_or(true, |(_, best)| hours > best) {
                top = Some((user, hours));
            }
        }
        let Some((top_user, _)) = top else {
            return Ok(error_value(&format!("No se encontraron datos para el género '{genre}'")));
        };

        let mut per_year: BTreeMap<i64, f64> = BTreeMap::new();
        for row in matching.iter().filter(|r| r.user_id == top_user) {
            if let Some(year) = parse_year(&row.year) {
                *per_year.entry(year).or_insert(0.0) += parse_number(&row.hours).unwrap_or(0.0);
            }
        }
        let hours: Vec<Value> = per_year
            .into_iter()
            .map(|(year, h)| json!({ "Año": year, "Horas": number_value(h) }))
            .collect();

        let mut out = Map::new();
        out.insert(format!("Usuario con más horas jugadas para {genre}"), Value::String(top_user.to_string()));
        out.insert("Horas jugadas".to_string(), Value::Array(hours));
        Ok(Value::Object(out))
    }

    /// Top three developers by recommendations for `year`; ties keep file order.
    pub fn best_developer_year(&self, year: i64) -> Result<Value> {
        let rows = self.best_developers.as_deref().ok_or(Error::DatasetUnavailable("best_developer_year"))?;
        let mut scored: Vec<(&str, f64)> = rows
            .iter()
            .filter(|r| parse_year(&r.year) == Some(year))
            .filter_map(|r| parse_number(&r.recommendations).map(|n| (r.developer.as_str(), n)))
            .collect();
        if scored.is_empty() {
            return Ok(error_value(&format!("No se encontraron datos para el año {year}")));
        }
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        let podium: Vec<Value> = scored
            .into_iter()
            .take(3)
            .enumerate()
            .map(|(i, (dev, _))| Value::String(format!("Puesto {}: {}", i + 1, dev)))
            .collect();
        Ok(Value::Array(podium))
    }

    /// Review counts per sentiment for an exact developer name.
    pub fn developer_reviews_analysis(&self, developer: &str) -> Result<Value> {
        let rows = self.developer_reviews.as_deref().ok_or(Error::DatasetUnavailable("developer_reviews_analysis"))?;
        let mut per_sentiment: BTreeMap<String, f64> = BTreeMap::new();
        let mut matched = false;
        for row in rows.iter().filter(|r| r.developer == developer) {
            matched = true;
            *per_sentiment.entry(canonical_id(&row.sentiment)).or_insert(0.0) += parse_number(&row.count).unwrap_or(0.0);
        }
        if !matched {
            return Ok(error_value(&format!("No se encontraron datos para el desarrollador '{developer}'")));
        }
        let counts: Map<String, Value> = per_sentiment.into_iter().map(|(s, n)| (s, number_value(n))).collect();
        let mut out = Map::new();
        out.insert(developer.to_string(), Value::Object(counts));
        Ok(Value::Object(out))
    }
}

/// Query strings are regular expressions; one that does not compile matches literally.
fn pattern(query: &str, case_insensitive: bool) -> Regex {
    RegexBuilder::new(query)
        .case_insensitive(case_insensitive)
        .build()
        .or_else(|_| RegexBuilder::new(&regex::escape(query)).case_insensitive(case_insensitive).build())
        .expect("escaped pattern is valid")
}

fn error_value(message: &str) -> Value {
    json!({ "Error": message })
}

/// Lenient numeric cell: decimal comma accepted, blank is `None`.
fn parse_number(cell: &str) -> Option<f64> {
    let cleaned = cell.trim().replace(',', ".");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn parse_year(cell: &str) -> Option<i64> {
    canonical_id(cell).parse().ok()
}

/// JSON number for numeric looking cells, string otherwise.
fn cell_value(cell: &str) -> Value {
    let trimmed = cell.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return Value::from(i);
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() => Value::from(f),
        _ => Value::String(cell.to_string()),
    }
}

fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        Value::from(n)
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn format_decimal(x: f64) -> String {
    if x.fract() == 0.0 { format!("{x:.1}") } else { format!("{x}") }
}
