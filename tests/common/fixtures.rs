use rollbook::jobs::{Job, JobPayload, OutputFormat, RosterPayload};
use rollbook_types::MemberRecord;
use serde_json::{Value, json};

/// A valid CUID-shaped id, distinct per `n`.
pub fn job_id(n: usize) -> String {
    format!("c{:024}", n)
}

pub fn member(name: &str, ld: &str, ed: &str) -> MemberRecord {
    MemberRecord {
        name: name.to_string(),
        address: Some(format!("{} Main St", name.len())),
        city: Some("Rochester".into()),
        legislative_district: Some(ld.to_string()),
        election_district: Some(ed.to_string()),
        party: Some("DEM".into()),
        position: Some("Committee Member".into()),
    }
}

pub fn members(count: usize, ld: &str, ed: &str) -> Vec<MemberRecord> {
    (0..count)
        .map(|i| member(&format!("Member {i}"), ld, ed))
        .collect()
}

pub fn roster_job(n: usize, author: &str) -> Job {
    Job {
        job_id: job_id(n),
        payload: JobPayload::Roster(RosterPayload {
            title: format!("Roster {n}"),
            members: members(3, "7", "12"),
            page_capacity: None,
        }),
        author: author.to_string(),
        format: OutputFormat::PaginatedDocument,
    }
}

pub fn roster_request(n: usize, format: &str) -> Value {
    json!({
        "jobId": job_id(n),
        "type": "report-with-pagination",
        "author": "Pat Doe",
        "format": format,
        "payload": {
            "title": "LD 7 Committee",
            "pageCapacity": 10,
            "members": [
                {"name": "Ann Lee", "legislativeDistrict": "7", "electionDistrict": "12", "party": "DEM"},
                {"name": "Bo Chan", "legislativeDistrict": "7", "electionDistrict": "3", "party": "REP"},
                {"name": "Cy Moss", "legislativeDistrict": "21", "electionDistrict": "1"}
            ]
        }
    })
}

pub fn statistics_request(n: usize, format: &str) -> Value {
    json!({
        "jobId": job_id(n),
        "type": "report-with-statistics",
        "author": "Pat Doe",
        "format": format,
        "payload": {
            "title": "Absentee Ballots",
            "rows": [
                {"ward": "45", "legislativeDistrict": "7", "party": "DEM", "dateSent": "2024-10-01", "dateReturned": "2024-10-04"},
                {"ward": "45", "legislativeDistrict": "7", "party": "REP", "dateSent": "2024-10-01"},
                {"ward": "3", "legislativeDistrict": "12", "party": "con", "dateSent": "10/2/2024", "dateReturned": "10/5/2024"}
            ]
        }
    })
}
