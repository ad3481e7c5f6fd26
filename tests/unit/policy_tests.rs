//! Route classification and the decision table, end to end through config
use backend_lib::config::LandingSettings;
use backend_lib::policy::{decide, Decision, RouteClass, RoutePolicy};
use whathefood_common::{Account, ClaimSet, Identity, Role};

fn signed_in(role: Role) -> Identity {
    Identity::Authenticated(ClaimSet::from(&Account::new("x@x.com", "X", role)))
}

const PAGES: [&str; 12] = [
    "/",
    "/about",
    "/faq",
    "/login",
    "/register",
    "/dashboard",
    "/profile",
    "/admin/dashboard",
    "/admin/users/3",
    "/dishes/new",
    "/tasks",
    "/users",
];

#[test]
fn test_every_page_has_exactly_one_outcome_per_identity() {
    let policy = RoutePolicy::default();
    let landing = LandingSettings::default();
    let identities = [Identity::Anonymous, signed_in(Role::User), signed_in(Role::Admin)];

    for path in PAGES {
        for identity in &identities {
            let first = decide(policy.classify(path), identity, &landing);
            let second = decide(policy.classify(path), identity, &landing);
            assert_eq!(first, second, "{path} {identity:?}");
        }
    }
}

#[test]
fn test_admin_required_pages_only_admit_admins() {
    let policy = RoutePolicy::default();
    let landing = LandingSettings::default();

    for path in PAGES {
        if policy.classify(path) != RouteClass::AdminRequired {
            continue;
        }
        assert_eq!(
            decide(policy.classify(path), &signed_in(Role::Admin), &landing),
            Decision::Allow,
            "{path}"
        );
        assert_eq!(
            decide(policy.classify(path), &signed_in(Role::User), &landing),
            Decision::Redirect("/dashboard"),
            "{path}"
        );
        assert_eq!(
            decide(policy.classify(path), &Identity::Anonymous, &landing),
            Decision::Redirect("/login"),
            "{path}"
        );
    }
}

#[test]
fn test_public_pages_allow_everyone() {
    let policy = RoutePolicy::default();
    let landing = LandingSettings::default();
    for path in ["/", "/about", "/privacy-policy", "/api/auth/login", "/images/a.png"] {
        assert_eq!(policy.classify(path), RouteClass::Public);
        for identity in [Identity::Anonymous, signed_in(Role::User), signed_in(Role::Admin)] {
            assert_eq!(decide(RouteClass::Public, &identity, &landing), Decision::Allow);
        }
    }
}
