//! Console routing table and its access guard.
//!
//! [`ConsoleRoute::resolve`] maps a path onto the known pages and
//! [`evaluate`] decides, from the session status alone, whether a page may
//! render. No navigation happens here; callers act on the [`GateDecision`].

use std::fmt;

use uuid::Uuid;

use super::{Role, SessionStatus};

/// Where unauthenticated visitors are sent.
pub const LOGIN_PATH: &str = "/login";
/// Where signed-in users without the required role are sent.
pub const LANDING_PATH: &str = "/dashboard";

/// Access requirement declared by a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// Anyone, signed in or not.
    Public,
    /// Any signed-in user.
    Authenticated,
    /// Signed-in users holding at least one of the roles.
    Restricted(&'static [Role]),
}

/// Outcome of evaluating a route against the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Session is still loading; show a placeholder.
    Placeholder,
    RedirectToLogin,
    RedirectToLanding,
    Render,
}

impl GateDecision {
    /// Redirect target, if the decision is a redirect.
    pub const fn redirect_path(self) -> Option<&'static str> {
        match self {
            Self::RedirectToLogin => Some(LOGIN_PATH),
            Self::RedirectToLanding => Some(LANDING_PATH),
            Self::Placeholder | Self::Render => None,
        }
    }
}

impl fmt::Display for GateDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Placeholder => f.write_str("placeholder"),
            Self::RedirectToLogin => write!(f, "redirect to {LOGIN_PATH}"),
            Self::RedirectToLanding => write!(f, "redirect to {LANDING_PATH}"),
            Self::Render => f.write_str("render"),
        }
    }
}

/// Decide whether a route with `access` may render for `status`.
///
/// # Examples
/// ```
/// use edtech_console::domain::{GateDecision, RouteAccess, SessionStatus, evaluate};
///
/// assert_eq!(
///     evaluate(&SessionStatus::SignedOut, RouteAccess::Authenticated),
///     GateDecision::RedirectToLogin,
/// );
/// assert_eq!(
///     evaluate(&SessionStatus::Loading, RouteAccess::Public),
///     GateDecision::Render,
/// );
/// ```
pub fn evaluate(status: &SessionStatus, access: RouteAccess) -> GateDecision {
    match (access, status) {
        (RouteAccess::Public, _) => GateDecision::Render,
        (_, SessionStatus::Loading) => GateDecision::Placeholder,
        (_, SessionStatus::SignedOut) => GateDecision::RedirectToLogin,
        (RouteAccess::Authenticated, SessionStatus::SignedIn(_)) => GateDecision::Render,
        (RouteAccess::Restricted(allowed), SessionStatus::SignedIn(snapshot)) => {
            if snapshot.roles.intersects(allowed) {
                GateDecision::Render
            } else {
                GateDecision::RedirectToLanding
            }
        }
    }
}

const ATTENDANCE_ROLES: &[Role] = &[Role::Admin, Role::Trainer, Role::Secretary];
const PAYMENT_ROLES: &[Role] = &[Role::Admin, Role::Finance];
const STUDENT_ROLES: &[Role] = &[Role::Admin, Role::Secretary];
const SALARY_ROLES: &[Role] = &[Role::Admin, Role::Finance];
const NOTICE_ROLES: &[Role] = &[Role::Admin, Role::Secretary];

/// A page of the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleRoute {
    Home,
    Programs,
    Services,
    Gallery,
    Contact,
    Careers,
    Apply(Uuid),
    Register,
    Login,
    Dashboard,
    Attendance,
    Payments,
    Students,
    Salaries,
    Notices,
    NotFound,
}

impl ConsoleRoute {
    /// Map a path onto a route; unknown paths resolve to [`Self::NotFound`].
    ///
    /// Query strings, fragments and trailing slashes are ignored.
    ///
    /// # Examples
    /// ```
    /// use edtech_console::domain::ConsoleRoute;
    ///
    /// assert_eq!(ConsoleRoute::resolve("/dashboard/payments/"), ConsoleRoute::Payments);
    /// assert_eq!(ConsoleRoute::resolve("/nope"), ConsoleRoute::NotFound);
    /// ```
    pub fn resolve(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|part| !part.is_empty()).collect();
        match segments.as_slice() {
            [] => Self::Home,
            ["programs"] => Self::Programs,
            ["services"] => Self::Services,
            ["gallery"] => Self::Gallery,
            ["contact"] => Self::Contact,
            ["careers"] => Self::Careers,
            ["careers", vacancy, "apply"] => {
                Uuid::parse_str(vacancy).map_or(Self::NotFound, Self::Apply)
            }
            ["register"] => Self::Register,
            ["login"] => Self::Login,
            ["dashboard"] => Self::Dashboard,
            ["dashboard", "attendance"] => Self::Attendance,
            ["dashboard", "payments"] => Self::Payments,
            ["dashboard", "students"] => Self::Students,
            ["dashboard", "salaries"] => Self::Salaries,
            ["dashboard", "notices"] => Self::Notices,
            _ => Self::NotFound,
        }
    }

    /// Access requirement of this route.
    pub const fn access(self) -> RouteAccess {
        match self {
            Self::Home
            | Self::Programs
            | Self::Services
            | Self::Gallery
            | Self::Contact
            | Self::Careers
            | Self::Apply(_)
            | Self::Register
            | Self::Login
            | Self::NotFound => RouteAccess::Public,
            Self::Dashboard => RouteAccess::Authenticated,
            Self::Attendance => RouteAccess::Restricted(ATTENDANCE_ROLES),
            Self::Payments => RouteAccess::Restricted(PAYMENT_ROLES),
            Self::Students => RouteAccess::Restricted(STUDENT_ROLES),
            Self::Salaries => RouteAccess::Restricted(SALARY_ROLES),
            Self::Notices => RouteAccess::Restricted(NOTICE_ROLES),
        }
    }

    /// Evaluate this route for `status`.
    pub fn gate(self, status: &SessionStatus) -> GateDecision {
        evaluate(status, self.access())
    }
}

impl fmt::Display for ConsoleRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => f.write_str("/"),
            Self::Programs => f.write_str("/programs"),
            Self::Services => f.write_str("/services"),
            Self::Gallery => f.write_str("/gallery"),
            Self::Contact => f.write_str("/contact"),
            Self::Careers => f.write_str("/careers"),
            Self::Apply(vacancy) => write!(f, "/careers/{vacancy}/apply"),
            Self::Register => f.write_str("/register"),
            Self::Login => f.write_str(LOGIN_PATH),
            Self::Dashboard => f.write_str(LANDING_PATH),
            Self::Attendance => f.write_str("/dashboard/attendance"),
            Self::Payments => f.write_str("/dashboard/payments"),
            Self::Students => f.write_str("/dashboard/students"),
            Self::Salaries => f.write_str("/dashboard/salaries"),
            Self::Notices => f.write_str("/dashboard/notices"),
            Self::NotFound => f.write_str("not found"),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{RoleSet, SessionSnapshot, UserId};
    use rstest::rstest;

    fn signed_in(roles: &[Role]) -> SessionStatus {
        SessionStatus::SignedIn(SessionSnapshot {
            user_id: UserId::random(),
            email: None,
            profile: None,
            roles: roles.iter().copied().collect::<RoleSet>(),
        })
    }

    #[rstest]
    #[case(SessionStatus::Loading, RouteAccess::Authenticated, GateDecision::Placeholder)]
    #[case(SessionStatus::Loading, RouteAccess::Restricted(PAYMENT_ROLES), GateDecision::Placeholder)]
    #[case(SessionStatus::SignedOut, RouteAccess::Authenticated, GateDecision::RedirectToLogin)]
    #[case(SessionStatus::SignedOut, RouteAccess::Restricted(PAYMENT_ROLES), GateDecision::RedirectToLogin)]
    #[case(signed_in(&[]), RouteAccess::Authenticated, GateDecision::Render)]
    #[case(signed_in(&[Role::Student]), RouteAccess::Restricted(PAYMENT_ROLES), GateDecision::RedirectToLanding)]
    #[case(signed_in(&[]), RouteAccess::Restricted(PAYMENT_ROLES), GateDecision::RedirectToLanding)]
    #[case(signed_in(&[Role::Student, Role::Finance]), RouteAccess::Restricted(PAYMENT_ROLES), GateDecision::Render)]
    #[case(SessionStatus::SignedOut, RouteAccess::Public, GateDecision::Render)]
    fn decision_table(
        #[case] status: SessionStatus,
        #[case] access: RouteAccess,
        #[case] expected: GateDecision,
    ) {
        assert_eq!(evaluate(&status, access), expected);
    }

    #[rstest]
    #[case("/", ConsoleRoute::Home)]
    #[case("", ConsoleRoute::Home)]
    #[case("/programs", ConsoleRoute::Programs)]
    #[case("/gallery?kind=video", ConsoleRoute::Gallery)]
    #[case("/careers/", ConsoleRoute::Careers)]
    #[case("/dashboard", ConsoleRoute::Dashboard)]
    #[case("/dashboard/salaries", ConsoleRoute::Salaries)]
    #[case("/careers/not-a-uuid/apply", ConsoleRoute::NotFound)]
    #[case("/dashboard/unknown", ConsoleRoute::NotFound)]
    #[case("/admin", ConsoleRoute::NotFound)]
    fn resolves_paths(#[case] path: &str, #[case] expected: ConsoleRoute) {
        assert_eq!(ConsoleRoute::resolve(path), expected);
    }

    #[test]
    fn apply_route_round_trips_vacancy_id() {
        let vacancy = Uuid::new_v4();
        let route = ConsoleRoute::Apply(vacancy);
        assert_eq!(ConsoleRoute::resolve(&route.to_string()), route);
        assert_eq!(route.access(), RouteAccess::Public);
    }

    #[test]
    fn trainer_reaches_attendance_but_not_salaries() {
        let trainer = signed_in(&[Role::Trainer]);
        assert_eq!(ConsoleRoute::Attendance.gate(&trainer), GateDecision::Render);
        assert_eq!(
            ConsoleRoute::Salaries.gate(&trainer),
            GateDecision::RedirectToLanding
        );
        assert_eq!(
            GateDecision::RedirectToLanding.redirect_path(),
            Some(LANDING_PATH)
        );
    }
}
