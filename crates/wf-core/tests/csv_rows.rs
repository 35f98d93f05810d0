//! Row structs deserialize from the literal fixture CSV lines.
//!
//! Embedded commas are quoted with single quotes, so every reader here uses
//! `'` as its quote character.

use csv::{ReaderBuilder, Trim};
use pretty_assertions::assert_eq;
use serde::de::DeserializeOwned;
use wf_core::datetime;
use wf_core::entities::{Lab, Project, Session, Subject, SubjectPart, User};
use wf_core::enums::Sex;

fn rows<T: DeserializeOwned>(lines: &[&str]) -> Vec<T> {
    let text = lines.join("\n");
    ReaderBuilder::new()
        .quote(b'\'')
        .trim(Trim::All)
        .from_reader(text.as_bytes())
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .unwrap()
}

#[test]
fn lab_address_keeps_embedded_commas() {
    let labs: Vec<Lab> = rows(&[
        "lab,lab_name,institution,address,time_zone,location,location_description",
        "LabA,The Example Lab,Example Uni,'221B Baker St,London NW1 6XE,UK',UTC+0,Example Building,'2nd floor lab dedicated to all fictional experiments.'",
    ]);
    assert_eq!(labs.len(), 1);
    assert_eq!(labs[0].address, "221B Baker St,London NW1 6XE,UK");
    assert_eq!(
        labs[0].location_description,
        "2nd floor lab dedicated to all fictional experiments."
    );
}

#[test]
fn project_urls_are_optional() {
    let projects: Vec<Project> = rows(&[
        "project,project_description,repository_url,repository_name,codeurl",
        "ProjC,No code yet,,,",
    ]);
    assert_eq!(projects[0].repository_url, None);
    assert_eq!(projects[0].codeurl, None);
}

#[test]
fn user_contact_fields() {
    let users: Vec<User> = rows(&[
        "lab,user,user_role,user_email,user_cellphone",
        "LabA,Sherlock,PI,Sherlock@BakerSt.com,+44 20 7946 0344",
    ]);
    assert_eq!(users[0].user_cellphone.as_deref(), Some("+44 20 7946 0344"));
}

#[test]
fn subject_dates_and_sex() {
    let subjects: Vec<Subject> = rows(&[
        "subject,sex,subject_birth_date,subject_description,death_date,cull_method",
        "subject6,M,2020-01-01 00:00:01,manuel,2020-10-03 00:00:01,natural causes",
        "subject7,U,2021-01-01 00:00:00,alive,,",
    ]);
    assert_eq!(subjects[0].sex, Sex::Male);
    assert_eq!(
        subjects[0].death_date.map(|d| datetime::format(&d)).as_deref(),
        Some("2020-10-03 00:00:01")
    );
    assert_eq!(subjects[1].death_date, None);
    assert_eq!(subjects[1].cull_method, None);
}

#[test]
fn subject_part_all_links() {
    let parts: Vec<SubjectPart> = rows(&[
        "subject,protocol,user,line,strain,source,lab",
        "subject6,ProtA,User1,line,strain,source,LabA",
    ]);
    assert_eq!(parts[0].protocol.as_deref(), Some("ProtA"));
    assert_eq!(parts[0].lab.as_deref(), Some("LabA"));
}

#[test]
fn session_key_and_backslash_dir() {
    let sessions: Vec<Session> = rows(&[
        "subject,project,session_datetime,session_dir,session_note,user",
        "subject3,ProjA,2020-05-12 04:13:07,subject3\\session1,Data collection notes,User1",
    ]);
    assert_eq!(sessions[0].key(), "subject3@2020-05-12 04:13:07");
    assert_eq!(sessions[0].session_dir.as_deref(), Some("subject3\\session1"));
}
