use hallmonitor_config::Configuration;

use crate::event::NotificationRequest;

/// Determine if a matched request should be delivered.
///
/// Returns `Ok(())` if the request is to be published, or `Err(reason)` if it
/// should be silently dropped. Recomputed for every request:
/// `always_send_notifications OR (auto_notifications_on_dc AND NOT attached)`,
/// overridden by `request.force`. A missing topic or credential suppresses
/// delivery regardless.
pub fn gate(
    request: &NotificationRequest,
    attached: bool,
    config: &Configuration,
) -> Result<(), Suppressed> {
    let wanted = config.always_send_notifications || (config.auto_notifications_on_dc && !attached);
    if !wanted && !request.force {
        return Err(Suppressed::ClientAttached);
    }
    if !config.is_publish_configured() {
        return Err(Suppressed::NotConfigured);
    }
    Ok(())
}

/// Reason a matched request was not delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suppressed {
    /// Notifications are not currently wanted (operator present, no override).
    ClientAttached,
    /// Topic or credentials are unset.
    NotConfigured,
}

impl std::fmt::Display for Suppressed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ClientAttached => write!(f, "notifications not wanted right now"),
            Self::NotConfigured => write!(f, "topic or credentials not configured"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {super::*, rstest::rstest, secrecy::Secret};

    fn configured() -> Configuration {
        Configuration {
            topic: "arn:aws:sns:us-east-1:123456789012:alerts".into(),
            access_key: "AKIDEXAMPLE".into(),
            secret_key: Secret::new("s3cr3t".into()),
            ..Default::default()
        }
    }

    fn request() -> NotificationRequest {
        NotificationRequest::new("#ops (alice@)", "outage")
    }

    #[rstest]
    //    always  auto   attached force  delivered
    #[case(false, false, true, false, false)]
    #[case(false, false, false, false, false)]
    #[case(true, false, true, false, true)]
    #[case(false, true, false, false, true)]
    #[case(false, true, true, false, false)]
    #[case(false, false, true, true, true)]
    #[case(true, true, true, true, true)]
    fn gating_truth_table(
        #[case] always: bool,
        #[case] auto_on_dc: bool,
        #[case] attached: bool,
        #[case] force: bool,
        #[case] delivered: bool,
    ) {
        let config = Configuration {
            always_send_notifications: always,
            auto_notifications_on_dc: auto_on_dc,
            ..configured()
        };
        let req = NotificationRequest { force, ..request() };
        assert_eq!(gate(&req, attached, &config).is_ok(), delivered);
    }

    #[test]
    fn attached_operator_suppresses_unforced_match() {
        assert_eq!(
            gate(&request(), true, &configured()),
            Err(Suppressed::ClientAttached)
        );
    }

    #[rstest]
    #[case::no_access_key("", "s3cr3t", "arn:t")]
    #[case::no_secret_key("AKID", "", "arn:t")]
    #[case::no_topic("AKID", "s3cr3t", "")]
    fn missing_credentials_suppress_even_forced(
        #[case] access_key: &str,
        #[case] secret_key: &str,
        #[case] topic: &str,
    ) {
        let config = Configuration {
            access_key: access_key.into(),
            secret_key: Secret::new(secret_key.into()),
            topic: topic.into(),
            always_send_notifications: true,
            ..Default::default()
        };
        let req = request();
        assert_eq!(gate(&req, false, &config), Err(Suppressed::NotConfigured));
        let forced = NotificationRequest { force: true, ..req };
        assert_eq!(gate(&forced, false, &config), Err(Suppressed::NotConfigured));
    }
}
