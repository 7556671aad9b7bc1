//! Personal information command.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use crate::client::PortalClient;
use crate::extract::MarksExtractor;
use crate::store::SessionStore;

/// Show personal information on record with the portal.
#[derive(Parser, Debug)]
#[command(name = "profile")]
pub struct ProfileCommand {}

impl ProfileCommand {
    pub async fn execute<C, X>(self, session: &SessionStore<C, X>) -> Result<()>
    where
        C: PortalClient,
        X: MarksExtractor,
    {
        let info = session.profile().await?;
        let general = &info.generalinformation;

        println!("{}", general.studentname.bold());
        println!("{:<18} {}", "Enrollment", general.registrationno);
        println!(
            "{:<18} {} / {} (batch {})",
            "Program", general.programcode, general.branch, general.batch
        );
        println!("{:<18} {}", "Semester", general.semester);
        println!("{:<18} {}", "Section", general.sectioncode);
        println!("{:<18} {}", "Academic year", general.academicyear);
        if !general.studentemailid.is_empty() {
            println!("{:<18} {}", "Email", general.studentemailid);
        }
        if !general.studentcellno.is_empty() {
            println!("{:<18} {}", "Phone", general.studentcellno);
        }
        if !general.bloodgroup.is_empty() {
            println!("{:<18} {}", "Blood group", general.bloodgroup);
        }

        if !info.qualification.is_empty() {
            println!("\nQualifications:");
            for qual in &info.qualification {
                println!(
                    "  {:<12} {} ({}%)",
                    qual.qualificationcode, qual.boardname, qual.percentagemarks
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::JsonReportExtractor;
    use crate::models::{GeneralInfo, PersonalInfo};
    use crate::test_utils::MockPortal;

    #[tokio::test]
    async fn renders_profile() {
        let info = PersonalInfo {
            generalinformation: GeneralInfo {
                studentname: "A Student".to_string(),
                registrationno: "21103042".to_string(),
                ..GeneralInfo::default()
            },
            qualification: vec![],
        };
        let portal = MockPortal::new().with_personal_info(info);
        let session = SessionStore::new(portal, JsonReportExtractor);
        ProfileCommand {}.execute(&session).await.unwrap();
        assert_eq!(session.client().calls.personal_info.load(std::sync::atomic::Ordering::SeqCst), 1);
    }
}
