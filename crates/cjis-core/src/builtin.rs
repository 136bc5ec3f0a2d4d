//! Built-in CJIS Security Policy requirement table.

use crate::requirement::Requirement;

/// Sections of the built-in table, in authoring order.
pub(crate) fn sections() -> Vec<(&'static str, Vec<Requirement>)> {
    vec![
        ("authenticator_management", authenticator_management()),
        ("media_protection", media_protection()),
        ("access_control", access_control()),
        ("audit_and_accountability", audit_and_accountability()),
        ("physical_protection", physical_protection()),
    ]
}

fn authenticator_management() -> Vec<Requirement> {
    vec![
        Requirement::new(
            "5.6.3.2.1",
            "5.6.3.2",
            "Define Initial Authenticator Content",
            "Agencies shall define initial authenticator content for authenticators defined by the organization.",
            &["initial", "authenticator", "content", "define", "organization"],
        ),
        Requirement::new(
            "5.6.3.2.2",
            "5.6.3.2",
            "Establish Authenticator Administrative Procedures",
            "Agencies shall establish administrative procedures for initial authenticator distribution, for lost, compromised, or damaged authenticators, and for revoking authenticators.",
            &["administrative procedures", "distribution", "lost", "compromised", "revok"],
        ),
        Requirement::new(
            "5.6.3.2.3",
            "5.6.3.2",
            "Change Default Authenticators",
            "Agencies shall change default authenticators prior to first use.",
            &["default", "changed", "first", "login"],
        ),
        Requirement::new(
            "5.6.3.2.4",
            "5.6.3.2",
            "Protect Authenticator Content",
            "Agencies shall protect authenticator content from unauthorized disclosure and modification.",
            &["protect", "unauthorized disclosure", "modification", "sharing"],
        ),
        Requirement::new(
            "5.6.2.1.1",
            "5.6.2.1",
            "Password Composition and Lifetime",
            "Passwords shall be a minimum of eight characters, shall not be a dictionary word or proper name, and shall be changed at least every 90 days.",
            &["password", "8 characters", "90 days", "dictionary"],
        )
        .non_critical(),
    ]
}

fn media_protection() -> Vec<Requirement> {
    vec![
        Requirement::new(
            "5.10.1.1",
            "5.10.1",
            "Media Access Control",
            "The information system shall restrict access to digital and non-digital media to authorized individuals.",
            &["restrict access", "media", "authorized", "individuals"],
        ),
        Requirement::new(
            "5.8.2",
            "5.8",
            "Media Transport",
            "Agencies shall protect and control digital and physical media during transport outside of controlled areas and restrict the activities associated with transport of such media to authorized personnel.",
            &["transport", "controlled areas", "authorized personnel", "media"],
        ),
        Requirement::new(
            "5.8.3",
            "5.8",
            "Digital Media Sanitization and Disposal",
            "The agency shall sanitize, that is, overwrite at least three times or degauss digital media prior to disposal or release for reuse by unauthorized individuals.",
            &["sanitize", "overwrite", "degauss", "disposal", "reuse"],
        ),
        Requirement::new(
            "5.8.4",
            "5.8",
            "Disposal of Physical Media",
            "Physical media shall be securely disposed of when no longer required, using formal procedures such as shredding or incineration.",
            &["physical media", "disposed", "shred", "incinerat"],
        )
        .non_critical(),
    ]
}

fn access_control() -> Vec<Requirement> {
    vec![
        Requirement::new(
            "5.2.1",
            "5.2",
            "Least Privilege Access",
            "Agencies shall enforce the principle of least privilege, allowing only authorized accesses for users (or processes acting on behalf of users) which are necessary to accomplish assigned tasks.",
            &["least privilege", "authorized access", "need-to-know", "need-to-share", "role-based"],
        ),
        Requirement::new(
            "5.5.1",
            "5.5",
            "Account Management",
            "The agency shall manage information system accounts, including establishing, activating, modifying, reviewing, disabling, and removing accounts, and shall validate accounts at least annually.",
            &["account", "establish", "modif", "review", "disabl", "remov", "annual"],
        ),
        Requirement::new(
            "5.5.3",
            "5.5",
            "Unsuccessful Login Attempts",
            "Where technically feasible, the system shall enforce a limit of no more than five consecutive invalid access attempts by a user and automatically lock the account for a minimum of ten minutes.",
            &["invalid", "attempts", "consecutive", "lock"],
        ),
        Requirement::new(
            "5.5.5",
            "5.5",
            "Session Lock",
            "The information system shall prevent further access to the system by initiating a session lock after a maximum of 30 minutes of inactivity.",
            &["session lock", "inactivity", "30 minutes"],
        )
        .non_critical(),
    ]
}

fn audit_and_accountability() -> Vec<Requirement> {
    vec![
        Requirement::new(
            "5.4.1",
            "5.4",
            "Audit Log Generation",
            "The information system shall generate audit records containing information that establishes what type of event occurred, when the event occurred, where the event occurred, the source of the event, the outcome of the event, and the identity of any user/subject associated with the event.",
            &["audit records", "generate", "event", "when", "where", "source", "outcome", "identity", "user"],
        ),
        Requirement::new(
            "5.4.3",
            "5.4",
            "Response to Audit Processing Failures",
            "The agency's information system shall provide alerts to appropriate agency officials in the event of an audit processing failure.",
            &["alert", "audit", "failure", "officials"],
        ),
        Requirement::new(
            "5.4.4",
            "5.4",
            "Time Stamps",
            "The agency's information system shall provide time stamps for use in audit record generation, synchronized to an authoritative time source.",
            &["time stamp", "timestamp", "synchroniz"],
        )
        .non_critical(),
        Requirement::new(
            "5.4.6",
            "5.4",
            "Protection of Audit Information",
            "The agency's information system shall protect audit information and audit tools from modification, deletion, and unauthorized access.",
            &["protect", "audit information", "modification", "deletion", "unauthorized access"],
        ),
        Requirement::new(
            "5.4.7",
            "5.4",
            "Audit Record Retention",
            "The agency shall retain audit records for at least one year. Once the minimum retention time period has passed, the agency shall continue to retain audit records until it is determined they are no longer needed.",
            &["retain", "retention", "one year", "audit records"],
        ),
    ]
}

fn physical_protection() -> Vec<Requirement> {
    vec![
        Requirement::new(
            "5.9.1",
            "5.9",
            "Physical Access Control",
            "The agency shall limit physical access to information systems, equipment, and the respective operating environments to authorized individuals.",
            &["limit", "physical access", "systems", "equipment", "authorized individuals"],
        ),
        Requirement::new(
            "5.9.1.2",
            "5.9.1",
            "Physical Access Authorizations",
            "The agency shall develop and keep current a list of personnel with authorized access to the physically secure location or shall issue credentials to authorized personnel.",
            &["list of personnel", "authorized access", "credentials", "physically secure location"],
        ),
        Requirement::new(
            "5.9.1.3",
            "5.9.1",
            "Physical Access Points",
            "The agency shall control all physical access points, except for those areas officially designated as publicly accessible, and shall verify individual access authorizations before granting access.",
            &["access points", "verify", "authorization", "granting access"],
        ),
        Requirement::new(
            "5.9.1.7",
            "5.9.1",
            "Visitor Control",
            "The agency shall control physical access by authenticating visitors before authorizing escorted access to the physically secure location.",
            &["visitor", "escort", "authenticat"],
        )
        .non_critical(),
    ]
}
