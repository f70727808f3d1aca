//! # Notification Composer
//!
//! Renders the operator notification and the customer confirmation for an
//! accepted quote request.
//!
//! Composition is deterministic: the same request and booking ID always
//! produce the same pair. The "received" time in the operator message comes
//! from the booking ID rather than the wall clock.
//!
//! Date and time formatting is best-effort. `2025-06-01` becomes
//! `Sunday, June 1, 2025` and `14:00` becomes `2:00 PM`; anything that does
//! not parse is shown as entered.
//!
//! # Examples
//!
//! ```
//! use limo_quote::domain::services::notification_composer::{format_pickup_date, format_pickup_time};
//!
//! assert_eq!(format_pickup_date("2025-06-01"), "Sunday, June 1, 2025");
//! assert_eq!(format_pickup_time("14:00"), "2:00 PM");
//! assert_eq!(format_pickup_date("next Tuesday"), "next Tuesday");
//! ```

use crate::domain::entities::{
    MessagePriority, Notification, NotificationPair, RecipientRole, ValidatedQuoteRequest,
};
use crate::domain::value_objects::{BookingId, BusinessProfile};
use chrono::{NaiveDate, NaiveTime};

const DATE_INPUT_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];
const TIME_INPUT_FORMATS: [&str; 3] = ["%H:%M", "%H:%M:%S", "%I:%M %p"];

/// Renders [`NotificationPair`]s.
#[derive(Debug, Clone)]
pub struct NotificationComposer {
    profile: BusinessProfile,
    operator_mailbox: String,
}

impl NotificationComposer {
    /// Creates a composer.
    ///
    /// # Arguments
    ///
    /// * `profile` - Contact details printed in customer confirmations
    /// * `operator_mailbox` - Where operator notifications are sent
    #[must_use]
    pub fn new(profile: BusinessProfile, operator_mailbox: impl Into<String>) -> Self {
        Self {
            profile,
            operator_mailbox: operator_mailbox.into(),
        }
    }

    /// Returns the business profile.
    #[must_use]
    pub fn profile(&self) -> &BusinessProfile {
        &self.profile
    }

    /// Renders both notifications for an accepted request.
    #[must_use]
    pub fn compose(
        &self,
        request: &ValidatedQuoteRequest,
        booking_id: &BookingId,
    ) -> NotificationPair {
        NotificationPair {
            business: self.business_notification(request, booking_id),
            customer: self.customer_notification(request, booking_id),
        }
    }

    fn business_notification(
        &self,
        request: &ValidatedQuoteRequest,
        booking_id: &BookingId,
    ) -> Notification {
        let received = booking_id
            .issued_at()
            .map(|ts| ts.to_display_string())
            .unwrap_or_else(|| "just now".to_string());

        let mut body = html_open(&format!("New Quote Request - {}", self.profile.name));
        body.push_str(&format!(
            "<h1>NEW QUOTE REQUEST</h1>\n\
             <p><strong>BOOKING ID: {id}</strong><br><small>Received: {received}</small></p>\n",
            id = escape_html(booking_id.as_str()),
            received = escape_html(&received),
        ));
        body.push_str(&format!(
            "<h2>Customer Contact Information</h2>\n\
             <p><strong>Name:</strong> {name}<br>\n\
             <strong>Phone:</strong> <a href=\"tel:{phone}\">{phone}</a><br>\n\
             <strong>Email:</strong> <a href=\"mailto:{email}\">{email}</a></p>\n",
            name = escape_html(request.full_name()),
            phone = escape_html(request.phone()),
            email = escape_html(request.email()),
        ));
        body.push_str("<table>\n");
        body.push_str(&table_row(
            "Trip Details",
            &format!(
                "<strong>Type:</strong> {}<br><strong>Date:</strong> {}<br><strong>Time:</strong> {}",
                escape_html(request.trip_type()),
                escape_html(&format_pickup_date(request.pickup_date())),
                escape_html(&format_pickup_time(request.pickup_time())),
            ),
        ));
        body.push_str(&table_row(
            "Vehicle & Passengers",
            &format!(
                "<strong>Vehicle Type:</strong> {}<br><strong>Number of Passengers:</strong> {}",
                escape_html(request.vehicle_type()),
                escape_html(request.num_passengers()),
            ),
        ));
        body.push_str(&table_row(
            "Locations",
            &format!(
                "<strong>Pickup:</strong> {}<br><strong>Drop-off:</strong> {}<br><strong>City:</strong> {}, {}",
                escape_html(request.pickup_location()),
                escape_html(request.drop_location()),
                escape_html(request.city()),
                escape_html(request.state()),
            ),
        ));
        if request.has_special_requests() {
            body.push_str(&table_row(
                "Special Requests",
                &format!("<em>{}</em>", escape_html(request.special_requests())),
            ));
        }
        body.push_str("</table>\n");
        body.push_str(
            "<p class=\"priority\">PRIORITY: Respond within 2 hours for best customer experience</p>\n",
        );
        body.push_str(&format!(
            "<footer><p><strong>{name}</strong> | {email} | {phone}</p>\n\
             <p>This is an automated notification from your quote request system.</p></footer>\n",
            name = escape_html(&self.profile.name),
            email = escape_html(&self.profile.email),
            phone = escape_html(&self.profile.phone),
        ));
        body.push_str(HTML_CLOSE);

        Notification {
            role: RecipientRole::Business,
            to: self.operator_mailbox.clone(),
            sender_name: self.profile.name.clone(),
            subject: format!(
                "NEW QUOTE REQUEST - {} - {}",
                booking_id,
                request.full_name()
            ),
            html_body: body,
            priority: MessagePriority::High,
        }
    }

    fn customer_notification(
        &self,
        request: &ValidatedQuoteRequest,
        booking_id: &BookingId,
    ) -> Notification {
        let passengers = match request.passenger_count() {
            Some(n) if n > 1 => "passengers",
            _ => "passenger",
        };

        let mut body = html_open(&format!("Quote Request Confirmation - {}", self.profile.name));
        body.push_str(&format!(
            "<h1>Quote Request Received!</h1>\n\
             <p>Thank you for choosing {business}</p>\n\
             <p>Dear <strong>{name}</strong>,</p>\n\
             <p>We have received your quote request and our team is already working on a \
             detailed quote for you.</p>\n",
            business = escape_html(&self.profile.name),
            name = escape_html(request.full_name()),
        ));
        body.push_str(&format!(
            "<h2>Your Request Summary</h2>\n\
             <p><strong>Booking ID:</strong> {id}</p>\n\
             <p><strong>Service Date:</strong> {date} at {time}</p>\n\
             <p><strong>Trip Type:</strong> {trip}</p>\n\
             <p><strong>Vehicle:</strong> {vehicle} for {count} {passengers}</p>\n\
             <p><strong>Route:</strong> {pickup} &rarr; {drop}</p>\n",
            id = escape_html(booking_id.as_str()),
            date = escape_html(&format_pickup_date(request.pickup_date())),
            time = escape_html(&format_pickup_time(request.pickup_time())),
            trip = escape_html(request.trip_type()),
            vehicle = escape_html(request.vehicle_type()),
            count = escape_html(request.num_passengers()),
            pickup = escape_html(request.pickup_location()),
            drop = escape_html(request.drop_location()),
        ));
        body.push_str(
            "<h2>What Happens Next?</h2>\n<ul>\n\
             <li><strong>Within 2 hours:</strong> Our team will review your request</li>\n\
             <li><strong>Within 24 hours:</strong> You'll receive a detailed quote via email</li>\n\
             <li><strong>Booking confirmation:</strong> Once approved, we'll send booking details</li>\n\
             </ul>\n",
        );
        body.push_str(&format!(
            "<h2>Need Immediate Assistance?</h2>\n\
             <p><strong>Call us directly:</strong> <a href=\"tel:{phone}\">{phone}</a></p>\n\
             <p><strong>Email:</strong> <a href=\"mailto:{email}\">{email}</a></p>\n\
             <p>Available 24/7 for your convenience</p>\n\
             <p>Best regards,<br><strong>{name} Team</strong></p>\n\
             <footer><p>{area}</p>\n\
             <p>This is an automated confirmation. Please save this email for your records.</p></footer>\n",
            phone = escape_html(&self.profile.phone),
            email = escape_html(&self.profile.email),
            name = escape_html(&self.profile.name),
            area = escape_html(&self.profile.service_area),
        ));
        body.push_str(HTML_CLOSE);

        Notification {
            role: RecipientRole::Customer,
            to: request.email().to_string(),
            sender_name: format!("{} Reservations", self.profile.name),
            subject: format!("Quote Request Confirmation - {booking_id}"),
            html_body: body,
            priority: MessagePriority::Normal,
        }
    }
}

/// Formats a pickup date for people, echoing the input if it does not parse.
#[must_use]
pub fn format_pickup_date(raw: &str) -> String {
    DATE_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw.trim(), fmt).ok())
        .map(|date| date.format("%A, %B %-d, %Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Formats a pickup time on a 12-hour clock, echoing the input if it does not parse.
#[must_use]
pub fn format_pickup_time(raw: &str) -> String {
    TIME_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(raw.trim(), fmt).ok())
        .map(|time| time.format("%-I:%M %p").to_string())
        .unwrap_or_else(|| raw.to_string())
}

const HTML_CLOSE: &str = "</div>\n</body>\n</html>\n";

fn html_open(title: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n\
         <style>body{{font-family:'Segoe UI',Tahoma,sans-serif;line-height:1.6;color:#333}}\
         .container{{max-width:650px;margin:0 auto}}\
         h1{{background:#D4AF37;color:#000;padding:24px;text-align:center}}\
         th{{text-align:left;padding:12px;width:35%}}td{{padding:12px}}\
         .priority{{background:#d4edda;padding:12px;font-weight:600;text-align:center}}\
         footer{{color:#6c757d;font-size:14px;text-align:center}}</style>\n\
         </head>\n<body>\n<div class=\"container\">\n",
        escape_html(title)
    )
}

fn table_row(heading: &str, cell: &str) -> String {
    format!("<tr><th>{heading}</th><td>{cell}</td></tr>\n")
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
