//! Behavioural coverage for the command-line surface.

use std::sync::Arc;

use chrono::NaiveDate;
use clap::Parser;
use rstest::{fixture, rstest};

use super::*;
use crate::context::ConsolePorts;
use crate::domain::{
    Amount, AttendanceRecord, AttendanceStatus, ErrorCode, PaymentRecord, PaymentStatus,
    Program, Role, SessionStatus,
};
use crate::test_support::{
    FixedClock, InMemoryAuth, InMemoryCatalogue, InMemoryDashboard, InMemoryProfiles,
};

const FEED: FeedSettings = FeedSettings {
    limit: 5,
    period: Duration::from_secs(60),
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn program(name: &str, start: NaiveDate, eligibility: &[&str]) -> Program {
    Program {
        id: Uuid::new_v4(),
        name: name.to_owned(),
        description: String::new(),
        start_date: Some(start),
        end_date: None,
        eligibility: eligibility.iter().map(|level| (*level).to_owned()).collect(),
        is_active: true,
    }
}

struct Harness {
    auth: Arc<InMemoryAuth>,
    profiles: Arc<InMemoryProfiles>,
    catalogue: Arc<InMemoryCatalogue>,
    dashboard: Arc<InMemoryDashboard>,
    context: ConsoleContext,
}

impl Harness {
    async fn run(&self, args: &[&str]) -> Result<String, CliError> {
        let cli = Cli::try_parse_from(
            std::iter::once("edtech-console").chain(args.iter().copied()),
        )
        .expect("arguments parse");
        let mut out = Vec::new();
        run(cli, &self.context, FEED, &mut out).await?;
        Ok(String::from_utf8(out).expect("utf-8 output"))
    }
}

#[fixture]
fn harness() -> Harness {
    let auth = Arc::new(InMemoryAuth::new());
    let profiles = Arc::new(InMemoryProfiles::new());
    let catalogue = Arc::new(InMemoryCatalogue::new());
    let dashboard = Arc::new(InMemoryDashboard::new());
    let ports = ConsolePorts {
        auth: auth.clone(),
        profiles: profiles.clone(),
        catalogue: catalogue.clone(),
        dashboard: dashboard.clone(),
        applications: catalogue.clone(),
        registrations: catalogue.clone(),
        gallery: catalogue.clone(),
        storage: catalogue.clone(),
    };
    let clock = Arc::new(FixedClock::at_date(date(2026, 3, 12)));
    let context = ConsoleContext::start(ports, clock, "gallery");
    Harness {
        auth,
        profiles,
        catalogue,
        dashboard,
        context,
    }
}

fn domain_code(result: Result<String, CliError>) -> ErrorCode {
    match result {
        Err(CliError::Domain(error)) => error.code(),
        other => panic!("expected a domain error, got {other:?}"),
    }
}

#[rstest]
#[case(&["edtech-console", "programs"], 1, 10)]
#[case(&["edtech-console", "--page", "3", "vacancies"], 3, 10)]
#[case(&["edtech-console", "gallery", "--page-size", "4", "--kind", "video"], 1, 4)]
fn paging_flags_are_global(#[case] args: &[&str], #[case] page: usize, #[case] size: usize) {
    let cli = Cli::try_parse_from(args.iter().copied()).expect("arguments parse");
    assert_eq!(cli.paging.page, page);
    assert_eq!(cli.paging.page_size.get(), size);
}

#[rstest]
#[case(&["edtech-console", "--page-size", "0", "programs"])]
#[case(&["edtech-console", "gallery", "--kind", "audio"])]
#[case(&["edtech-console", "register", "--name", "Asha"])]
fn malformed_arguments_are_rejected(#[case] args: &[&str]) {
    assert!(Cli::try_parse_from(args.iter().copied()).is_err());
}

#[rstest]
#[tokio::test]
async fn programs_are_paged(harness: Harness) {
    harness.catalogue.add_program(program("Networking", date(2026, 5, 1), &[]));
    harness.catalogue.add_program(program("Web Development", date(2026, 4, 1), &[]));
    harness.catalogue.add_program(program("Graphic Design", date(2026, 6, 1), &[]));

    let output = harness
        .run(&["--page", "2", "--page-size", "2", "programs"])
        .await
        .expect("listing succeeds");
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(lines.len(), 2, "{output}");
    assert!(lines[0].contains("Graphic Design"));
    assert_eq!(lines[1], "page 2/2 (3 items)");
}

#[rstest]
#[tokio::test]
async fn out_of_range_page_shows_the_first(harness: Harness) {
    harness.catalogue.add_program(program("Networking", date(2026, 5, 1), &[]));

    let output = harness
        .run(&["--page", "9", "programs"])
        .await
        .expect("listing succeeds");

    assert!(output.contains("Networking"));
    assert!(output.ends_with("page 1/1 (1 items)\n"));
}

#[rstest]
#[tokio::test]
async fn stats_require_credentials(harness: Harness) {
    assert_eq!(
        domain_code(harness.run(&["stats"]).await),
        ErrorCode::Unauthorized
    );
}

#[rstest]
#[tokio::test]
async fn stats_render_for_staff(harness: Harness) {
    let user_id = harness.auth.with_account("finance@edtech.test", "secret");
    harness.profiles.grant(&user_id, Role::Finance);
    harness.dashboard.set_counts(42, 6);
    let student = Uuid::new_v4();
    for (day, status) in [
        (10, AttendanceStatus::Present),
        (11, AttendanceStatus::Present),
        (11, AttendanceStatus::Absent),
    ] {
        harness.dashboard.add_attendance(AttendanceRecord {
            student_id: student,
            date: date(2026, 3, day),
            status,
        });
    }
    harness.dashboard.add_payment(PaymentRecord {
        student_id: student,
        amount: Amount::from_minor(1_500_000),
        status: PaymentStatus::Paid,
        payment_date: date(2026, 3, 2),
    });

    let output = harness
        .run(&[
            "stats",
            "--email",
            "finance@edtech.test",
            "--password",
            "secret",
        ])
        .await
        .expect("stats load");

    assert_eq!(
        output,
        "total students: 42\nactive classes: 6\nattendance rate: 67%\nmonthly revenue: 15000.00\n"
    );
    assert_eq!(harness.context.session().status(), SessionStatus::SignedOut);
}

#[rstest]
#[tokio::test]
async fn anonymous_dashboard_route_redirects(harness: Harness) {
    let output = harness
        .run(&["route", "/dashboard/payments"])
        .await
        .expect("route evaluates");

    assert_eq!(
        output,
        "session: anonymous\n/dashboard/payments: redirect to /login\n"
    );
}

#[rstest]
#[tokio::test]
async fn route_with_credentials_uses_roles(harness: Harness) {
    let user_id = harness.auth.with_account("desk@edtech.test", "secret");
    harness.profiles.insert_profile(&user_id, "Sita Desk");
    harness.profiles.grant(&user_id, Role::Secretary);

    let output = harness
        .run(&[
            "route",
            "/dashboard/notices",
            "--email",
            "desk@edtech.test",
            "--password",
            "secret",
        ])
        .await
        .expect("route evaluates");

    assert_eq!(
        output,
        "session: Sita Desk (secretary)\n/dashboard/notices: render\n"
    );
}

#[rstest]
#[tokio::test]
async fn registration_walks_the_wizard(harness: Harness) {
    let course = program("Web Development", date(2026, 4, 1), &["+2", "Bachelor"]);
    let course_id = course.id.to_string();
    harness.catalogue.add_program(course);

    let output = harness
        .run(&[
            "register",
            "--name",
            "Asha Rai",
            "--date-of-birth",
            "2004-02-14",
            "--gender",
            "female",
            "--email",
            "asha@example.com",
            "--phone",
            "9800000000",
            "--address",
            "Kathmandu",
            "--program",
            &course_id,
            "--education-level",
            "+2",
        ])
        .await
        .expect("registration succeeds");

    assert!(output.starts_with("registered student "), "{output}");
    assert!(output.trim_end().ends_with("for Web Development"));
    let registrations = harness.catalogue.registrations();
    assert_eq!(registrations.len(), 1);
    assert_eq!(registrations[0].guardian_name, None);
}

#[rstest]
#[tokio::test]
async fn registration_refuses_ineligible_levels(harness: Harness) {
    let course = program("Web Development", date(2026, 4, 1), &["Bachelor"]);
    let course_id = course.id.to_string();
    harness.catalogue.add_program(course);

    let result = harness
        .run(&[
            "register",
            "--name",
            "Asha Rai",
            "--date-of-birth",
            "2004-02-14",
            "--gender",
            "female",
            "--email",
            "asha@example.com",
            "--phone",
            "9800000000",
            "--address",
            "Kathmandu",
            "--program",
            &course_id,
            "--education-level",
            "SEE",
        ])
        .await;

    assert_eq!(domain_code(result), ErrorCode::InvalidRequest);
    assert!(harness.catalogue.registrations().is_empty());
}

#[rstest]
#[tokio::test]
async fn applying_to_unknown_vacancy_is_not_found(harness: Harness) {
    let vacancy = Uuid::new_v4().to_string();
    let result = harness
        .run(&[
            "apply",
            &vacancy,
            "--name",
            "Ram Thapa",
            "--email",
            "ram@example.com",
            "--phone",
            "9811111111",
            "--resume",
            "Five years of CCNA teaching",
        ])
        .await;

    assert_eq!(domain_code(result), ErrorCode::NotFound);
    assert!(harness.catalogue.applications().is_empty());
}
