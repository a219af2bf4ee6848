// src/transform/mod.rs
pub mod date;
pub mod numbers;
pub mod state;
pub mod text;

use anyhow::{bail, Result};
use chrono::NaiveDate;
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::info;

/// One lottery drawing event, keyed by contest number.
#[derive(Debug, Clone, PartialEq)]
pub struct Draw {
    pub contest: i64,
    pub lottery: Option<String>,
    pub date: Option<NaiveDate>,
    pub venue: Option<String>,
    pub collected: Option<f64>,
    pub accumulated_0_5: Option<f64>,
    pub accumulated_special: Option<f64>,
    pub accumulated_next: Option<f64>,
    pub estimated_next: Option<f64>,
}

/// One ball revealed during a draw, in reveal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawnNumber {
    pub contest: i64,
    /// 1-based, dense over the surviving values of the source list.
    pub position: i64,
    pub number: i64,
}

/// One payout bracket of a draw.
#[derive(Debug, Clone, PartialEq)]
pub struct PrizeTier {
    pub contest: i64,
    pub tier: Option<i64>,
    pub description: Option<String>,
    pub winners: Option<i64>,
    pub amount: Option<f64>,
}

/// Aggregated winner count for one municipality/state of a draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinnerLocation {
    pub contest: i64,
    pub municipality: Option<String>,
    /// Valid 2-letter code, or `None` when the raw UF did not normalize.
    pub state: Option<&'static str>,
    pub winners: Option<i64>,
}

/// Tally of skipped records and fields that normalized to null.
///
/// Monetary and description omissions are deliberately not tracked; the
/// report covers exactly these five categories.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NullCounts {
    /// Records dropped outright for lacking a contest number.
    pub missing_contest: u64,
    pub missing_date: u64,
    pub missing_venue: u64,
    /// Records that yielded no drawn numbers at all.
    pub missing_numbers: u64,
    /// Winner entries whose UF did not normalize to a valid code.
    pub invalid_state: u64,
}

/// Everything one transform pass produces.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TransformOutput {
    pub draws: Vec<Draw>,
    pub numbers: Vec<DrawnNumber>,
    pub tiers: Vec<PrizeTier>,
    pub winners: Vec<WinnerLocation>,
    /// Valid codes observed among winner entries, ordered.
    pub seen_states: BTreeSet<&'static str>,
    pub counts: NullCounts,
}

/// Run the full normalization pass over the raw records, in input order.
///
/// A record without a contest number is counted and skipped outright — it
/// produces no rows of any kind. A record whose contest number is present
/// but non-numeric fails the whole run. Everything else is best-effort:
/// fields that do not normalize become null in the emitted row.
#[tracing::instrument(level = "info", skip(records), fields(records = records.len()))]
pub fn transform(records: &[Value]) -> Result<TransformOutput> {
    let mut out = TransformOutput::default();

    for (idx, rec) in records.iter().enumerate() {
        let contest = match rec.get("concurso") {
            None | Some(Value::Null) => {
                out.counts.missing_contest += 1;
                continue;
            }
            Some(v) => match to_i64(Some(v)) {
                Some(c) => c,
                None => bail!("record {idx}: field 'concurso' is not numeric: {v}"),
            },
        };

        let draw_date = date::parse_date(field_str(rec, "data").as_deref());
        if draw_date.is_none() {
            out.counts.missing_date += 1;
        }
        let venue = text::clean_text(field_str(rec, "local").as_deref());
        if venue.is_none() {
            out.counts.missing_venue += 1;
        }

        out.draws.push(Draw {
            contest,
            lottery: text::clean_text(field_str(rec, "loteria").as_deref()),
            date: draw_date,
            venue,
            collected: to_f64(rec.get("valorArrecadado")),
            accumulated_0_5: to_f64(rec.get("valorAcumuladoConcurso_0_5")),
            accumulated_special: to_f64(rec.get("valorAcumuladoConcursoEspecial")),
            accumulated_next: to_f64(rec.get("valorAcumuladoProximoConcurso")),
            estimated_next: to_f64(rec.get("valorEstimadoProximoConcurso")),
        });

        // draw-order list preferred; `dezenas` is the fallback when it is
        // absent, null, or empty
        let balls = rec
            .get("dezenasOrdemSorteio")
            .and_then(Value::as_array)
            .filter(|a| !a.is_empty())
            .or_else(|| rec.get("dezenas").and_then(Value::as_array));
        let nums = numbers::clean_numbers(balls.map(Vec::as_slice).unwrap_or_default());
        if nums.is_empty() {
            out.counts.missing_numbers += 1;
        }
        for (pos, number) in nums.into_iter().enumerate() {
            out.numbers.push(DrawnNumber {
                contest,
                position: pos as i64 + 1,
                number,
            });
        }

        for tier in list_field(rec, "premiacoes") {
            out.tiers.push(PrizeTier {
                contest,
                tier: to_i64(tier.get("faixa")),
                description: text::clean_text(field_str(tier, "descricao").as_deref()),
                winners: to_i64(tier.get("ganhadores")),
                amount: to_f64(tier.get("valorPremio")),
            });
        }

        for winner in list_field(rec, "localGanhadores") {
            let uf = state::normalize_uf(field_str(winner, "uf").as_deref());
            match uf {
                Some(code) => {
                    out.seen_states.insert(code);
                }
                None => out.counts.invalid_state += 1,
            }
            out.winners.push(WinnerLocation {
                contest,
                municipality: text::clean_text(field_str(winner, "municipio").as_deref()),
                state: uf,
                winners: to_i64(winner.get("ganhadores")),
            });
        }
    }

    info!(
        draws = out.draws.len(),
        numbers = out.numbers.len(),
        tiers = out.tiers.len(),
        winners = out.winners.len(),
        skipped = out.counts.missing_contest,
        "transform complete"
    );
    Ok(out)
}

/// Scalar field accessor: the export is loosely typed, so text fields may
/// arrive as strings or bare numbers.
fn field_str(rec: &Value, key: &str) -> Option<String> {
    match rec.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn to_f64(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn to_i64(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn list_field<'a>(rec: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> {
    rec.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
        .iter()
}
