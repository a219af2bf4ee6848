// src/store/mod.rs
use crate::transform::{state, TransformOutput};
use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use std::path::Path;
use tracing::info;

/// The persisted schema. Table and column names are the data contract of
/// the output file; child tables carry a synthetic key plus the owning
/// contest number, with no enforced foreign-key constraint.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS estados (
    uf TEXT PRIMARY KEY,
    nome_estado TEXT,
    regiao TEXT
);

CREATE TABLE IF NOT EXISTS sorteios (
    concurso INTEGER PRIMARY KEY,
    loteria TEXT,
    data TEXT,
    local TEXT,
    valorArrecadado REAL,
    valorAcumuladoConcurso_0_5 REAL,
    valorAcumuladoConcursoEspecial REAL,
    valorAcumuladoProximoConcurso REAL,
    valorEstimadoProximoConcurso REAL
);

CREATE TABLE IF NOT EXISTS dezenas (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    concurso INTEGER,
    posicao INTEGER,
    numero INTEGER
);

CREATE TABLE IF NOT EXISTS premiacoes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    concurso INTEGER,
    faixa INTEGER,
    descricao TEXT,
    ganhadores INTEGER,
    valorPremio REAL
);

CREATE TABLE IF NOT EXISTS ganhadores (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    concurso INTEGER,
    municipio TEXT,
    uf TEXT,
    ganhadores INTEGER
);
";

/// Open (or create) the database file at `path`.
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(&path)
        .with_context(|| format!("failed to open database {:?}", path.as_ref()))
}

/// Create the schema if needed and load one transform pass.
///
/// `sorteios` rows are replaced by contest number, so re-running the same
/// input leaves them unchanged by identity; the child tables are
/// append-only and accumulate duplicates across re-runs. Returns the
/// number of rows written.
#[tracing::instrument(level = "info", skip_all)]
pub fn load(conn: &mut Connection, out: &TransformOutput) -> Result<usize> {
    conn.execute_batch(SCHEMA).context("creating tables")?;

    let tx = conn.transaction().context("opening load transaction")?;
    let mut written = 0usize;

    {
        let mut stmt = tx.prepare(
            "INSERT OR IGNORE INTO estados (uf, nome_estado, regiao) VALUES (?1, ?2, ?3)",
        )?;
        for uf in out.seen_states.iter().copied() {
            // defensive: an observed code outside the static table lands
            // with null name/region
            let (name, region) = match state::state_info(uf) {
                Some(s) => (Some(s.name), Some(s.region)),
                None => (None, None),
            };
            written += stmt.execute(params![uf, name, region])?;
        }
    }

    {
        let mut stmt = tx.prepare(
            "INSERT OR REPLACE INTO sorteios
             (concurso, loteria, data, local,
              valorArrecadado, valorAcumuladoConcurso_0_5,
              valorAcumuladoConcursoEspecial, valorAcumuladoProximoConcurso,
              valorEstimadoProximoConcurso)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )?;
        for d in &out.draws {
            written += stmt.execute(params![
                d.contest,
                d.lottery,
                d.date.map(|date| date.to_string()),
                d.venue,
                d.collected,
                d.accumulated_0_5,
                d.accumulated_special,
                d.accumulated_next,
                d.estimated_next,
            ])?;
        }
    }

    {
        let mut stmt =
            tx.prepare("INSERT INTO dezenas (concurso, posicao, numero) VALUES (?1, ?2, ?3)")?;
        for n in &out.numbers {
            written += stmt.execute(params![n.contest, n.position, n.number])?;
        }
    }

    {
        let mut stmt = tx.prepare(
            "INSERT INTO premiacoes (concurso, faixa, descricao, ganhadores, valorPremio)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for t in &out.tiers {
            written += stmt.execute(params![t.contest, t.tier, t.description, t.winners, t.amount])?;
        }
    }

    {
        let mut stmt = tx.prepare(
            "INSERT INTO ganhadores (concurso, municipio, uf, ganhadores)
             VALUES (?1, ?2, ?3, ?4)",
        )?;
        for w in &out.winners {
            written += stmt.execute(params![w.contest, w.municipality, w.state, w.winners])?;
        }
    }

    tx.commit().context("committing load")?;
    info!(rows = written, "load complete");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::transform;
    use serde_json::json;

    fn mem_conn() -> Connection {
        Connection::open_in_memory().unwrap()
    }

    fn sample_records(venue: &str) -> Vec<serde_json::Value> {
        vec![json!({
            "concurso": 100,
            "data": "15/03/2023",
            "local": venue,
            "dezenas": ["01", "05", "33"],
            "premiacoes": [
                {"faixa": 1, "descricao": "sena", "ganhadores": 2, "valorPremio": "1000000.50"}
            ],
            "localGanhadores": [
                {"municipio": "rio branco", "uf": "ac", "ganhadores": 1}
            ]
        })]
    }

    fn count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
            .unwrap()
    }

    #[test]
    fn loads_all_five_tables() -> Result<()> {
        let out = transform(&sample_records("brasília"))?;
        let mut conn = mem_conn();
        let written = load(&mut conn, &out)?;

        assert_eq!(written, 7);
        assert_eq!(count(&conn, "sorteios"), 1);
        assert_eq!(count(&conn, "dezenas"), 3);
        assert_eq!(count(&conn, "premiacoes"), 1);
        assert_eq!(count(&conn, "ganhadores"), 1);
        assert_eq!(count(&conn, "estados"), 1);

        let (name, region): (String, String) = conn.query_row(
            "SELECT nome_estado, regiao FROM estados WHERE uf = 'AC'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )?;
        assert_eq!(name, "Acre");
        assert_eq!(region, "Norte");

        let date: String =
            conn.query_row("SELECT data FROM sorteios WHERE concurso = 100", [], |r| {
                r.get(0)
            })?;
        assert_eq!(date, "2023-03-15");
        Ok(())
    }

    #[test]
    fn draws_replace_by_contest_last_write_wins() -> Result<()> {
        let mut conn = mem_conn();

        let first = transform(&sample_records("primeiro lugar"))?;
        load(&mut conn, &first)?;
        let second = transform(&sample_records("segundo lugar"))?;
        load(&mut conn, &second)?;

        assert_eq!(count(&conn, "sorteios"), 1);
        let venue: String =
            conn.query_row("SELECT local FROM sorteios WHERE concurso = 100", [], |r| {
                r.get(0)
            })?;
        assert_eq!(venue, "Segundo Lugar");
        Ok(())
    }

    #[test]
    fn rerun_duplicates_child_rows_only() -> Result<()> {
        let out = transform(&sample_records("brasília"))?;
        let mut conn = mem_conn();
        load(&mut conn, &out)?;
        load(&mut conn, &out)?;

        // replace-by-id does not extend to the child tables
        assert_eq!(count(&conn, "sorteios"), 1);
        assert_eq!(count(&conn, "estados"), 1);
        assert_eq!(count(&conn, "dezenas"), 6);
        assert_eq!(count(&conn, "premiacoes"), 2);
        assert_eq!(count(&conn, "ganhadores"), 2);
        Ok(())
    }

    #[test]
    fn invalid_state_rows_keep_a_null_uf() -> Result<()> {
        let records = vec![json!({
            "concurso": 7,
            "localGanhadores": [{"municipio": "lugar nenhum", "uf": "XX", "ganhadores": 3}]
        })];
        let out = transform(&records)?;
        let mut conn = mem_conn();
        load(&mut conn, &out)?;

        assert_eq!(count(&conn, "estados"), 0);
        let uf: Option<String> =
            conn.query_row("SELECT uf FROM ganhadores WHERE concurso = 7", [], |r| {
                r.get(0)
            })?;
        assert_eq!(uf, None);
        Ok(())
    }
}
