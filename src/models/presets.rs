// src/models/presets.rs
// Ready-made requests for the app's transactional notifications.
use super::notification::{NotificationRequest, PayloadData, Platform, Platforms, RecipientIds};

fn site_link(site_url: &str, path: &str) -> String {
    format!("{}/{}", site_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

impl NotificationRequest {
    /// Direct message to one or more users.
    pub fn to_user(
        user_ids: impl Into<RecipientIds>,
        title: impl Into<String>,
        message: impl Into<String>,
        data: PayloadData,
        platforms: Platforms,
    ) -> Self {
        NotificationRequest::new(title, message)
            .with_recipients(user_ids)
            .with_data(data)
            .with_platforms(platforms)
    }

    pub fn driver_approval(site_url: &str, driver_id: &str, approved: bool, reason: Option<&str>) -> Self {
        let (title, body) = if approved {
            (
                "🎉 Account Approved".to_string(),
                "Your driver account has been approved. You can start accepting rides now!".to_string(),
            )
        } else {
            let body = match reason {
                Some(reason) if !reason.trim().is_empty() => {
                    format!("Your driver application was not approved: {}", reason.trim())
                }
                _ => "Your driver application was not approved. Contact support for details.".to_string(),
            };
            ("📋 Application Update".to_string(), body)
        };

        NotificationRequest::new(title, body)
            .with_recipients(driver_id)
            .with_data_entry("type", "driver_approval")
            .with_data_entry("url", site_link(site_url, "/driver/status"))
            .with_data_entry("driver_id", driver_id)
            .with_data_entry("approved", approved)
    }

    pub fn ride_update(site_url: &str, user_ids: impl Into<RecipientIds>, ride_id: &str, status: &str) -> Self {
        let (title, body) = match status {
            "accepted" => (
                "🚗 Ride Accepted".to_string(),
                "A driver has accepted your ride request".to_string(),
            ),
            "driver_arriving" => (
                "🚗 Driver On The Way".to_string(),
                "Your driver is coming to the pickup location".to_string(),
            ),
            "driver_arrived" => (
                "📍 Driver Arrived".to_string(),
                "Your driver has arrived at the pickup location".to_string(),
            ),
            "in_progress" => (
                "🛣️ Ride In Progress".to_string(),
                "You are on your way to your destination".to_string(),
            ),
            "completed" => (
                "✅ Ride Completed".to_string(),
                "You have arrived. Thanks for riding with Sparrow!".to_string(),
            ),
            "cancelled" => (
                "❌ Ride Cancelled".to_string(),
                "Your ride has been cancelled".to_string(),
            ),
            _ => (
                "📋 Ride Status Updated".to_string(),
                format!("Ride status: {}", status),
            ),
        };

        NotificationRequest::new(title, body)
            .with_recipients(user_ids)
            .with_data_entry("type", "ride_update")
            .with_data_entry("url", site_link(site_url, &format!("/rides/{}", ride_id)))
            .with_data_entry("ride_id", ride_id)
            .with_data_entry("status", status)
    }

    pub fn payment(site_url: &str, user_id: &str, amount: f64, currency: &str, status: &str) -> Self {
        let amount_text = format!("{:.2} {}", amount, currency);
        let (title, body) = match status {
            "completed" => (
                "💳 Payment Received".to_string(),
                format!("We received your payment of {}", amount_text),
            ),
            "failed" => (
                "⚠️ Payment Failed".to_string(),
                format!("Your payment of {} could not be processed", amount_text),
            ),
            "pending" => (
                "⏳ Payment Pending".to_string(),
                format!("Your payment of {} is being processed", amount_text),
            ),
            "refunded" => (
                "↩️ Payment Refunded".to_string(),
                format!("{} has been refunded to you", amount_text),
            ),
            _ => (
                "💳 Payment Update".to_string(),
                format!("Payment of {}: {}", amount_text, status),
            ),
        };

        NotificationRequest::new(title, body)
            .with_recipients(user_id)
            .with_data_entry("type", "payment")
            .with_data_entry("url", site_link(site_url, "/payments"))
            .with_data_entry("amount", amount)
            .with_data_entry("currency", currency)
            .with_data_entry("status", status)
    }

    pub fn support(site_url: &str, user_id: &str, ticket_id: &str, message: &str) -> Self {
        NotificationRequest::new("💬 Support Reply", message)
            .with_recipients(user_id)
            .with_data_entry("type", "support")
            .with_data_entry("url", site_link(site_url, &format!("/support/{}", ticket_id)))
            .with_data_entry("ticket_id", ticket_id)
    }

    pub fn web_only(self) -> Self {
        self.with_platforms(Platforms::only(Platform::Web))
    }

    pub fn android_only(self) -> Self {
        self.with_platforms(Platforms::only(Platform::Android))
    }

    /// Canned broadcast used to check the provider wiring end to end.
    pub fn test_broadcast(audience: Option<&str>) -> Self {
        let mut request = NotificationRequest::new(
            "🔔 Test Notification",
            "If you can read this, push delivery is working.",
        )
        .with_data_entry("type", "test");
        request.audience = audience.map(str::to_string);
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SITE: &str = "https://sparrow.app/";

    #[test]
    fn test_driver_approval_targets_driver() {
        let request = NotificationRequest::driver_approval(SITE, "drv-1", true, None);
        assert_eq!(request.recipient_ids, Some(vec!["drv-1".to_string()]));
        assert_eq!(request.payload_data["type"], json!("driver_approval"));
        assert_eq!(request.payload_data["url"], json!("https://sparrow.app/driver/status"));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_driver_rejection_includes_reason() {
        let request = NotificationRequest::driver_approval(SITE, "drv-1", false, Some("expired licence"));
        assert!(request.body.contains("expired licence"));
        assert_eq!(request.payload_data["approved"], json!(false));
    }

    #[test]
    fn test_ride_update_status_text() {
        let request = NotificationRequest::ride_update(SITE, vec!["u1".to_string()], "ride-9", "driver_arrived");
        assert_eq!(request.title, "📍 Driver Arrived");
        assert_eq!(request.payload_data["url"], json!("https://sparrow.app/rides/ride-9"));

        let request = NotificationRequest::ride_update(SITE, "u1", "ride-9", "teleported");
        assert_eq!(request.body, "Ride status: teleported");
    }

    #[test]
    fn test_payment_formats_amount() {
        let request = NotificationRequest::payment(SITE, "u1", 12.5, "GHS", "completed");
        assert_eq!(request.body, "We received your payment of 12.50 GHS");
        assert_eq!(request.payload_data["type"], json!("payment"));
    }

    #[test]
    fn test_platform_presets() {
        let request = NotificationRequest::new("T", "M").web_only();
        assert_eq!(request.platforms, Platforms { web: true, android: false, ios: false });

        let request = NotificationRequest::new("T", "M").android_only();
        assert_eq!(request.platforms, Platforms { web: false, android: true, ios: false });
    }

    #[test]
    fn test_broadcast_has_no_recipients() {
        let request = NotificationRequest::test_broadcast(Some("drivers"));
        assert!(request.recipient_ids.is_none());
        assert_eq!(request.audience.as_deref(), Some("drivers"));
        assert_eq!(request.payload_data["type"], json!("test"));
    }
}
