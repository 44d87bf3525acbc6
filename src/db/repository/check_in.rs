use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::*;

const CHECK_IN_COLUMNS: &str =
    "id, patient_id, date, pain_level, symptoms, voice_transcript, risk_level, risk_explanation";

/// Inserts a scored check-in. Unscored records are refused at this layer too.
pub fn insert_check_in(conn: &Connection, check_in: &CheckIn) -> Result<(), DatabaseError> {
    let (Some(level), Some(explanation)) = (check_in.risk_level, &check_in.risk_explanation) else {
        return Err(DatabaseError::ConstraintViolation(format!(
            "check-in {} has no risk assessment",
            check_in.id
        )));
    };

    conn.execute(
        "INSERT INTO check_ins (id, patient_id, date, pain_level, symptoms,
         voice_transcript, risk_level, risk_explanation)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            check_in.id.to_string(),
            check_in.patient_id.to_string(),
            check_in.date.to_string(),
            check_in.pain_level,
            serde_json::to_string(&check_in.symptoms)?,
            check_in.voice_transcript,
            level.as_str(),
            serde_json::to_string(explanation)?,
        ],
    )?;
    Ok(())
}

/// Latest check-in for a patient.
///
/// Ordered by `seq` alone: appends arrive with non-decreasing dates, and the
/// text form of a date does not sort chronologically past year 9999.
pub fn get_latest_check_in(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<Option<CheckIn>, DatabaseError> {
    let sql = format!(
        "SELECT {CHECK_IN_COLUMNS} FROM check_ins
         WHERE patient_id = ?1
         ORDER BY seq DESC
         LIMIT 1"
    );
    let row = conn
        .query_row(&sql, params![patient_id.to_string()], read_row)
        .optional()?;
    row.map(check_in_from_row).transpose()
}

/// Full history for a patient, oldest first.
pub fn get_check_ins_for_patient(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<Vec<CheckIn>, DatabaseError> {
    let sql = format!(
        "SELECT {CHECK_IN_COLUMNS} FROM check_ins
         WHERE patient_id = ?1
         ORDER BY seq ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![patient_id.to_string()], read_row)?;

    let mut check_ins = Vec::new();
    for row in rows {
        check_ins.push(check_in_from_row(row?)?);
    }
    Ok(check_ins)
}

/// The last `limit` check-ins for a patient, oldest first.
pub fn get_recent_check_ins(
    conn: &Connection,
    patient_id: &Uuid,
    limit: usize,
) -> Result<Vec<CheckIn>, DatabaseError> {
    let sql = format!(
        "SELECT {CHECK_IN_COLUMNS} FROM check_ins
         WHERE patient_id = ?1
         ORDER BY seq DESC
         LIMIT ?2"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![patient_id.to_string(), limit as i64], read_row)?;

    let mut check_ins = Vec::new();
    for row in rows {
        check_ins.push(check_in_from_row(row?)?);
    }
    check_ins.reverse();
    Ok(check_ins)
}

pub fn check_in_exists(conn: &Connection, id: &Uuid) -> Result<bool, DatabaseError> {
    let exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM check_ins WHERE id = ?1",
        params![id.to_string()],
        |row| row.get(0),
    )?;
    Ok(exists)
}

pub fn count_check_ins(conn: &Connection, patient_id: &Uuid) -> Result<usize, DatabaseError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM check_ins WHERE patient_id = ?1",
        params![patient_id.to_string()],
        |row| row.get(0),
    )?;
    Ok(count as usize)
}

type CheckInRow = (String, String, String, i32, String, String, String, String);

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<CheckInRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
    ))
}

fn check_in_from_row(row: CheckInRow) -> Result<CheckIn, DatabaseError> {
    let (id, patient_id, date, pain_level, symptoms, voice_transcript, risk_level, explanation) =
        row;
    Ok(CheckIn {
        id: Uuid::parse_str(&id).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        patient_id: Uuid::parse_str(&patient_id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        date: NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .map_err(|e| DatabaseError::ConstraintViolation(format!("Invalid check-in date: {e}")))?,
        pain_level,
        symptoms: serde_json::from_str(&symptoms)?,
        voice_transcript,
        risk_level: Some(RiskLevel::from_str(&risk_level)?),
        risk_explanation: Some(serde_json::from_str(&explanation)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    fn make_check_in(patient_id: Uuid, date: &str, pain_level: i32) -> CheckIn {
        CheckIn {
            id: Uuid::new_v4(),
            patient_id,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            pain_level,
            symptoms: vec![SymptomTag::Fatigue, SymptomTag::SleepIssues],
            voice_transcript: "Barely slept".into(),
            risk_level: Some(RiskLevel::Medium),
            risk_explanation: Some(RiskExplanation {
                pain_change: Some("Pain level stable".into()),
                new_symptoms: None,
                sentiment_analysis: Some(SentimentLabel::Negative),
                keywords: Some(vec!["barely".into()]),
            }),
        }
    }

    #[test]
    fn insert_and_read_back() {
        let conn = open_memory_database().unwrap();
        let patient = Uuid::new_v4();
        let check_in = make_check_in(patient, "2026-01-15", 6);
        insert_check_in(&conn, &check_in).unwrap();

        let latest = get_latest_check_in(&conn, &patient).unwrap().unwrap();
        assert_eq!(latest, check_in);
    }

    #[test]
    fn unscored_insert_refused() {
        let conn = open_memory_database().unwrap();
        let mut check_in = make_check_in(Uuid::new_v4(), "2026-01-15", 6);
        check_in.risk_explanation = None;
        let err = insert_check_in(&conn, &check_in).unwrap_err();
        assert!(matches!(err, DatabaseError::ConstraintViolation(_)));
    }

    #[test]
    fn duplicate_id_rejected_by_schema() {
        let conn = open_memory_database().unwrap();
        let check_in = make_check_in(Uuid::new_v4(), "2026-01-15", 6);
        insert_check_in(&conn, &check_in).unwrap();
        assert!(matches!(
            insert_check_in(&conn, &check_in),
            Err(DatabaseError::Sqlite(_))
        ));
    }

    #[test]
    fn latest_is_none_for_unknown_patient() {
        let conn = open_memory_database().unwrap();
        assert!(get_latest_check_in(&conn, &Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn same_day_entries_follow_insertion_order() {
        let conn = open_memory_database().unwrap();
        let patient = Uuid::new_v4();
        let first = make_check_in(patient, "2026-01-15", 3);
        let second = make_check_in(patient, "2026-01-15", 5);
        insert_check_in(&conn, &first).unwrap();
        insert_check_in(&conn, &second).unwrap();

        let latest = get_latest_check_in(&conn, &patient).unwrap().unwrap();
        assert_eq!(latest.id, second.id);
        let all = get_check_ins_for_patient(&conn, &patient).unwrap();
        assert_eq!(all.iter().map(|c| c.id).collect::<Vec<_>>(), vec![first.id, second.id]);
    }

    #[test]
    fn histories_are_per_patient() {
        let conn = open_memory_database().unwrap();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        insert_check_in(&conn, &make_check_in(alice, "2026-01-15", 3)).unwrap();
        insert_check_in(&conn, &make_check_in(bob, "2026-01-16", 8)).unwrap();
        insert_check_in(&conn, &make_check_in(alice, "2026-01-17", 4)).unwrap();

        assert_eq!(count_check_ins(&conn, &alice).unwrap(), 2);
        assert_eq!(count_check_ins(&conn, &bob).unwrap(), 1);
        assert_eq!(get_latest_check_in(&conn, &alice).unwrap().unwrap().pain_level, 4);
    }

    #[test]
    fn recent_returns_tail_oldest_first() {
        let conn = open_memory_database().unwrap();
        let patient = Uuid::new_v4();
        for (day, pain) in [(10, 2), (11, 3), (12, 4), (13, 5)] {
            insert_check_in(&conn, &make_check_in(patient, &format!("2026-01-{day}"), pain)).unwrap();
        }
        let recent = get_recent_check_ins(&conn, &patient, 2).unwrap();
        assert_eq!(recent.iter().map(|c| c.pain_level).collect::<Vec<_>>(), vec![4, 5]);
    }

    #[test]
    fn exists_by_id() {
        let conn = open_memory_database().unwrap();
        let check_in = make_check_in(Uuid::new_v4(), "2026-01-15", 6);
        assert!(!check_in_exists(&conn, &check_in.id).unwrap());
        insert_check_in(&conn, &check_in).unwrap();
        assert!(check_in_exists(&conn, &check_in.id).unwrap());
    }
}
