//! The literal CSV fixtures written before ingestion.
//!
//! Each fixture has a fixed file under `<data_dir>/<schema>/`. Fields that
//! contain commas are already wrapped in single quotes, which is the quote
//! character the ingestion reader expects.

use std::fmt;
use std::path::PathBuf;

use wf_core::enums::Schema;

/// One of the ten CSV files the fixture graph can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CsvFixture {
    Labs,
    Projects,
    ProjectUsers,
    Publications,
    Keywords,
    Protocols,
    Users,
    Subjects,
    SubjectParts,
    Sessions,
}

const LABS: &[&str] = &[
    "lab,lab_name,institution,address,time_zone,location,location_description",
    "LabA,The Example Lab,Example Uni,'221B Baker St,London NW1 6XE,UK',UTC+0,Example Building,'2nd floor lab dedicated to all fictional experiments.'",
    "LabB,The Other Lab,Other Uni,'Oxford OX1 2JD, United Kingdom',UTC+0,Other Building,'fictional campus dedicated to imaginaryexperiments.'",
];

const PROJECTS: &[&str] = &[
    "project,project_description,repository_url,repository_name,codeurl",
    "ProjA,Example project to populate element-lab,https://github.com/datajoint/element-lab/,element-lab,https://github.com/datajoint/element-lab/tree/main/element_lab",
    "ProjB,Other example project to populate element-lab,https://github.com/datajoint/element-session/,element-session,https://github.com/datajoint/element-session/tree/main/element_session",
];

const PROJECT_USERS: &[&str] = &[
    "user,project",
    "Sherlock,ProjA",
    "Sherlock,ProjB",
    "Watson,ProjB",
    "Dr. Candace Pert,ProjA",
    "User1,ProjA",
];

const PUBLICATIONS: &[&str] = &[
    "project,publication",
    "ProjA,arXiv:1807.11104",
    "ProjA,arXiv:1807.11104v1",
];

const KEYWORDS: &[&str] = &[
    "project,keyword",
    "ProjA,Study",
    "ProjA,Example",
    "ProjB,Alternate",
];

const PROTOCOLS: &[&str] = &[
    "protocol,protocol_type,protocol_description",
    "ProtA,IRB expedited review,Protocol for managing data ingestion",
    "ProtB,Alternative Method,Limited protocol for piloting only",
];

const USERS: &[&str] = &[
    "lab,user,user_role,user_email,user_cellphone",
    "LabA,Sherlock,PI,Sherlock@BakerSt.com,+44 20 7946 0344",
    "LabA,Watson,Dr,DrWatson@BakerSt.com,+44 73 8389 1763",
    "LabB,Dr. Candace Pert,PI,Pert@gmail.com,+44 74 4046 5899",
    "LabA,User1,Lab Tech,fake@email.com,+44 1632 960103",
    "LabB,User2,Lab Tech,fake2@email.com,+44 1632 960102",
];

const SUBJECTS: &[&str] = &[
    "subject,sex,subject_birth_date,subject_description,death_date,cull_method",
    "subject3,F,2020-01-01 00:00:01,rich,2020-10-02 00:00:01,natural causes",
    "subject5,F,2020-01-01 00:00:01,rich,2020-10-02 00:00:01,natural causes",
    "subject6,M,2020-01-01 00:00:01,manuel,2020-10-03 00:00:01,natural causes",
];

const SUBJECT_PARTS: &[&str] = &[
    "subject,protocol,user,line,strain,source,lab",
    "subject6,ProtA,User1,line,strain,source,LabA",
    "subject5,ProtA,User1,line,strain,source,LabA",
];

const SESSIONS: &[&str] = &[
    "subject,project,session_datetime,session_dir,session_note,user",
    "subject3,ProjA,2020-05-12 04:13:07,subject3\\session1,Data collection notes,User1",
    "subject5,ProjA,2018-07-03 20:32:28,/subject5/session1,Successful data collection - no notes,User1",
    "subject6,ProjA,2021-06-02 14:04:22,/subject6/session1,Ambient temp abnormally low,User2",
];

impl CsvFixture {
    pub const ALL: [Self; 10] = [
        Self::Labs,
        Self::Projects,
        Self::ProjectUsers,
        Self::Publications,
        Self::Keywords,
        Self::Protocols,
        Self::Users,
        Self::Subjects,
        Self::SubjectParts,
        Self::Sessions,
    ];

    /// Name of the graph node that writes this file.
    #[must_use]
    pub const fn node_name(self) -> &'static str {
        match self {
            Self::Labs => "lab_csv",
            Self::Projects => "lab_project_csv",
            Self::ProjectUsers => "lab_project_users_csv",
            Self::Publications => "lab_publications_csv",
            Self::Keywords => "lab_keywords_csv",
            Self::Protocols => "lab_protocol_csv",
            Self::Users => "lab_user_csv",
            Self::Subjects => "subjects_csv",
            Self::SubjectParts => "subjects_part_csv",
            Self::Sessions => "sessions_csv",
        }
    }

    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Labs => "labs.csv",
            Self::Projects => "projects.csv",
            Self::ProjectUsers => "project_users.csv",
            Self::Publications => "publications.csv",
            Self::Keywords => "keywords.csv",
            Self::Protocols => "protocols.csv",
            Self::Users => "users.csv",
            Self::Subjects => "subjects.csv",
            Self::SubjectParts => "subjects_part.csv",
            Self::Sessions => "sessions.csv",
        }
    }

    /// Schema directory the file lives in.
    #[must_use]
    pub const fn schema(self) -> Schema {
        match self {
            Self::Subjects | Self::SubjectParts => Schema::Subject,
            Self::Sessions => Schema::Session,
            _ => Schema::Lab,
        }
    }

    /// Header line followed by the data rows, without line terminators.
    #[must_use]
    pub const fn content(self) -> &'static [&'static str] {
        match self {
            Self::Labs => LABS,
            Self::Projects => PROJECTS,
            Self::ProjectUsers => PROJECT_USERS,
            Self::Publications => PUBLICATIONS,
            Self::Keywords => KEYWORDS,
            Self::Protocols => PROTOCOLS,
            Self::Users => USERS,
            Self::Subjects => SUBJECTS,
            Self::SubjectParts => SUBJECT_PARTS,
            Self::Sessions => SESSIONS,
        }
    }

    /// Path relative to the data directory, e.g. `lab/labs.csv`.
    #[must_use]
    pub fn relative_path(self) -> PathBuf {
        PathBuf::from(self.schema().as_str()).join(self.file_name())
    }
}

impl fmt::Display for CsvFixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}
