// Typed resources served by the Victor Smart-Kill API
//
// Field sets mirror the remote JSON one-to-one; remote camelCase keys are
// renamed to snake_case struct fields. Each record enumerates its known
// keys for the strict unknown-field check in `decode.rs`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::decode::{Resource, top_level_unknown};

// ── Trap ─────────────────────────────────────────────────────────────

/// A physical trap device. The primary polled entity.
///
/// Identity key is `id`, stable across polls. A trap is recreated fully
/// on every poll -- snapshots are never patched in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trap {
    pub id: i64,
    pub url: String,
    pub corruption_status: i32,
    /// Lookup table of `(status code, description)` pairs served inline.
    pub corruption_status_options: Option<Vec<(i32, String)>>,
    pub operator: Option<String>,
    pub operator_name: Option<String>,
    pub name: String,
    pub ssid: String,
    pub serial_number: String,
    pub auto_upgrade: bool,
    pub status: i32,
    pub location: Option<String>,
    pub lat: Option<String>,
    pub long: Option<String>,
    pub upgrade_firmware: Option<String>,
    pub commercial_gateway: Option<String>,
    pub commercial_monitor_mode_enabled: bool,
    pub lorawan_app_key: Option<String>,
    pub site_name: Option<String>,
    pub floor_plan_x: Option<i32>,
    pub floor_plan_y: Option<i32>,
    pub building_name: Option<String>,
    pub floor_name: Option<String>,
    pub room: Option<String>,
    pub room_name: Option<String>,
    pub trap_type: i32,
    pub trap_type_verbose: String,
    pub alerts: i32,
    pub trapstatistics: TrapStatistics,
}

impl Trap {
    /// Description of the current `corruption_status` code, resolved
    /// through the inline options table.
    pub fn corruption_status_verbose(&self) -> Option<&str> {
        self.corruption_status_options
            .as_ref()?
            .iter()
            .find(|(code, _)| *code == self.corruption_status)
            .map(|(_, text)| text.as_str())
    }

    /// Coordinates as a `(lat, long)` pair, when both are present and
    /// parse. The API serves them as strings, empty when unset.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let lat = self.lat.as_deref()?.parse().ok()?;
        let long = self.long.as_deref()?.parse().ok()?;
        Some((lat, long))
    }
}

impl Resource for Trap {
    const NAME: &'static str = "Trap";
    const FIELDS: &'static [&'static str] = &[
        "id",
        "url",
        "corruption_status",
        "corruption_status_options",
        "operator",
        "operator_name",
        "name",
        "ssid",
        "serial_number",
        "auto_upgrade",
        "status",
        "location",
        "lat",
        "long",
        "upgrade_firmware",
        "commercial_gateway",
        "commercial_monitor_mode_enabled",
        "lorawan_app_key",
        "site_name",
        "floor_plan_x",
        "floor_plan_y",
        "building_name",
        "floor_name",
        "room",
        "room_name",
        "trap_type",
        "trap_type_verbose",
        "alerts",
        "trapstatistics",
    ];

    fn unknown_field(value: &Value) -> Option<String> {
        if let Some(key) = top_level_unknown(value, Self::FIELDS) {
            return Some(key);
        }
        let stats = value.get("trapstatistics")?;
        TrapStatistics::unknown_field(stats).map(|path| format!("trapstatistics.{path}"))
    }
}

// ── TrapStatistics ───────────────────────────────────────────────────

/// Telemetry nested inside a [`Trap`]. No independent lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrapStatistics {
    pub id: i64,
    pub url: String,
    pub trap: String,
    pub trap_name: String,
    pub kills_present: Option<i64>,
    pub install_date: DateTime<Utc>,
    pub owner_name: String,
    pub owner_email: String,
    pub last_report_date: Option<DateTime<Utc>>,
    pub last_kill_date: Option<DateTime<Utc>>,
    /// Raw sensor reading. See [`temperature_celsius`](Self::temperature_celsius).
    pub temperature: Option<i32>,
    pub battery_level: i32,
    pub total_kills: Option<i64>,
    pub total_escapes: Option<i64>,
    pub total_retreats: Option<i64>,
    pub rx_power_level: i32,
    pub firmware_version: String,
    pub trap_provisioned: bool,
    pub last_sequence_number: Option<i64>,
    pub wireless_network_rssi: i32,
    pub error_code: i32,
    pub send_conn_lost_nt: bool,
    pub send_empty_trap_nt: bool,
    pub board_type: String,
    pub last_maintenance_date: Option<String>,
}

impl TrapStatistics {
    /// Temperature in degrees Celsius, rounded to one decimal.
    ///
    /// The hardware reports twentieths of a degree; the /20 scaling is a
    /// reverse-engineered property of the boards and must stay exact.
    pub fn temperature_celsius(&self) -> Option<f64> {
        self.temperature
            .map(|raw| (f64::from(raw) / 20.0 * 10.0).round() / 10.0)
    }
}

impl Resource for TrapStatistics {
    const NAME: &'static str = "TrapStatistics";
    const FIELDS: &'static [&'static str] = &[
        "id",
        "url",
        "trap",
        "trap_name",
        "kills_present",
        "install_date",
        "owner_name",
        "owner_email",
        "last_report_date",
        "last_kill_date",
        "temperature",
        "battery_level",
        "total_kills",
        "total_escapes",
        "total_retreats",
        "rx_power_level",
        "firmware_version",
        "trap_provisioned",
        "last_sequence_number",
        "wireless_network_rssi",
        "error_code",
        "send_conn_lost_nt",
        "send_empty_trap_nt",
        "board_type",
        "last_maintenance_date",
    ];
}

// ── Activity ─────────────────────────────────────────────────────────

/// One entry of a trap's activity log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Activity {
    pub id: i64,
    pub url: String,
    pub trap: String,
    pub trap_name: String,
    pub time_stamp: DateTime<Utc>,
    pub time_stamp_unix: DateTime<Utc>,
    pub sequence_number: i64,
    pub activity_type: i32,
    pub activity_type_text: String,
    pub kills_present: i64,
    pub total_kills_reported: i64,
    pub battery_level: i32,
    pub wireless_network_rssi: i32,
    pub firmware_version_string: String,
    pub temperature: Option<i32>,
    pub board_type: String,
    pub error_code: i32,
    pub active: bool,
    #[serde(rename = "isRatKill")]
    pub is_rat_kill: bool,
    #[serde(rename = "sexKillDetail")]
    pub sex_kill_detail: Option<Value>,
    #[serde(rename = "ageKillDetail")]
    pub age_kill_detail: Option<Value>,
    #[serde(rename = "speciesKillDetail")]
    pub species_kill_detail: Option<Value>,
    #[serde(rename = "replacedAttractant")]
    pub replaced_attractant: bool,
    #[serde(rename = "replacedBattery")]
    pub replaced_battery: bool,
    #[serde(rename = "cleanedTrap")]
    pub cleaned_trap: bool,
    pub note: Option<Value>,
    pub site_id: Option<Value>,
    pub building_id: Option<Value>,
    pub floor_id: Option<Value>,
    pub floor_plan_x: Option<Value>,
    pub floor_plan_y: Option<Value>,
    pub trap_type_text: String,
}

impl Resource for Activity {
    const NAME: &'static str = "Activity";
    const FIELDS: &'static [&'static str] = &[
        "id",
        "url",
        "trap",
        "trap_name",
        "time_stamp",
        "time_stamp_unix",
        "sequence_number",
        "activity_type",
        "activity_type_text",
        "kills_present",
        "total_kills_reported",
        "battery_level",
        "wireless_network_rssi",
        "firmware_version_string",
        "temperature",
        "board_type",
        "error_code",
        "active",
        "isRatKill",
        "sexKillDetail",
        "ageKillDetail",
        "speciesKillDetail",
        "replacedAttractant",
        "replacedBattery",
        "cleanedTrap",
        "note",
        "site_id",
        "building_id",
        "floor_id",
        "floor_plan_x",
        "floor_plan_y",
        "trap_type_text",
    ];
}

// ── MobileApp ────────────────────────────────────────────────────────

/// Mobile app version requirements served by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MobileApp {
    pub url: String,
    pub min_android_version: i32,
    pub ideal_android_version: i32,
    pub min_ios_version: String,
    pub ideal_ios_version: String,
    pub commercial_min_android_version: i32,
    pub commercial_ideal_android_version: i32,
    pub commercial_min_ios_version: String,
    pub commercial_ideal_ios_version: String,
}

impl Resource for MobileApp {
    const NAME: &'static str = "MobileApp";
    const FIELDS: &'static [&'static str] = &[
        "url",
        "min_android_version",
        "ideal_android_version",
        "min_ios_version",
        "ideal_ios_version",
        "commercial_min_android_version",
        "commercial_ideal_android_version",
        "commercial_min_ios_version",
        "commercial_ideal_ios_version",
    ];
}

// ── Profile ──────────────────────────────────────────────────────────

/// Notification and contact preferences of an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Profile {
    pub id: i64,
    pub url: String,
    pub user: String,
    pub name: Option<String>,
    pub operator: String,
    pub operator_name: String,
    pub client: Option<String>,
    pub client_name: Option<String>,
    pub telephone_number: String,
    #[serde(rename = "phoneNames")]
    pub phone_names: Option<Value>,
    #[serde(rename = "phoneNumbers")]
    pub phone_numbers: Option<Value>,
    #[serde(rename = "emailAddresses")]
    pub email_addresses: Option<Value>,
    pub email_notifications_enabled: bool,
    pub notifications_enabled: bool,
    pub terms_version: i32,
    pub notify_wifi_connection: bool,
    pub notify_low_battery: bool,
    pub notify_kill_alerts: bool,
    pub notify_new_products: bool,
    pub text_notifications_enabled: bool,
    pub notify_empty_trap: bool,
    #[serde(rename = "fcmTokens")]
    pub fcm_tokens: Option<Value>,
    #[serde(rename = "apnsTokens")]
    pub apns_tokens: Option<Value>,
    #[serde(rename = "fcmARNs")]
    pub fcm_arns: Option<Value>,
    #[serde(rename = "apnsARNs")]
    pub apns_arns: Option<Value>,
    #[serde(rename = "fcmTokensPro")]
    pub fcm_tokens_pro: Option<Value>,
    #[serde(rename = "apnsTokensPro")]
    pub apns_tokens_pro: Option<Value>,
    #[serde(rename = "fcmARNsPro")]
    pub fcm_arns_pro: Option<Value>,
    #[serde(rename = "apnsARNsPro")]
    pub apns_arns_pro: Option<Value>,
    pub favorite_sites: Option<Value>,
    pub notify_false_trigger: bool,
}

impl Resource for Profile {
    const NAME: &'static str = "Profile";
    const FIELDS: &'static [&'static str] = &[
        "id",
        "url",
        "user",
        "name",
        "operator",
        "operator_name",
        "client",
        "client_name",
        "telephone_number",
        "phoneNames",
        "phoneNumbers",
        "emailAddresses",
        "email_notifications_enabled",
        "notifications_enabled",
        "terms_version",
        "notify_wifi_connection",
        "notify_low_battery",
        "notify_kill_alerts",
        "notify_new_products",
        "text_notifications_enabled",
        "notify_empty_trap",
        "fcmTokens",
        "apnsTokens",
        "fcmARNs",
        "apnsARNs",
        "fcmTokensPro",
        "apnsTokensPro",
        "fcmARNsPro",
        "apnsARNsPro",
        "favorite_sites",
        "notify_false_trigger",
    ];
}

// ── User ─────────────────────────────────────────────────────────────

/// An account, with its nested [`Profile`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub url: String,
    pub username: String,
    /// Hashed server-side; still never logged.
    pub password: String,
    pub email: String,
    pub groups: Vec<String>,
    pub group_names: Vec<String>,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub first_name: String,
    pub last_name: String,
    pub profile: Profile,
}

impl Resource for User {
    const NAME: &'static str = "User";
    const FIELDS: &'static [&'static str] = &[
        "id",
        "url",
        "username",
        "password",
        "email",
        "groups",
        "group_names",
        "date_joined",
        "last_login",
        "first_name",
        "last_name",
        "profile",
    ];

    fn unknown_field(value: &Value) -> Option<String> {
        if let Some(key) = top_level_unknown(value, Self::FIELDS) {
            return Some(key);
        }
        let profile = value.get("profile")?;
        Profile::unknown_field(profile).map(|path| format!("profile.{path}"))
    }
}

// ── TermsAndConditions ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermsAndConditions {
    pub id: i64,
    pub operator_id: i64,
    pub time_stamp: DateTime<Utc>,
    pub terms_and_conditions: String,
    pub terms_version: String,
}

impl Resource for TermsAndConditions {
    const NAME: &'static str = "TermsAndConditions";
    const FIELDS: &'static [&'static str] = &[
        "id",
        "operator_id",
        "time_stamp",
        "terms_and_conditions",
        "terms_version",
    ];
}

// ── Operator ─────────────────────────────────────────────────────────

/// A fleet operator: account, contact user, and accepted terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operator {
    pub id: i64,
    pub url: String,
    pub account_number: String,
    pub name: String,
    pub address: String,
    #[serde(rename = "type")]
    pub operator_type: i32,
    pub number_sites: i32,
    pub number_buildings: i32,
    pub number_traps: i32,
    pub terms_version: i32,
    pub terms: String,
    pub contact: User,
    pub terms_and_conditions: Option<Vec<TermsAndConditions>>,
}

impl Resource for Operator {
    const NAME: &'static str = "Operator";
    const FIELDS: &'static [&'static str] = &[
        "id",
        "url",
        "account_number",
        "name",
        "address",
        "type",
        "number_sites",
        "number_buildings",
        "number_traps",
        "terms_version",
        "terms",
        "contact",
        "terms_and_conditions",
    ];

    fn unknown_field(value: &Value) -> Option<String> {
        if let Some(key) = top_level_unknown(value, Self::FIELDS) {
            return Some(key);
        }
        if let Some(contact) = value.get("contact") {
            if let Some(path) = User::unknown_field(contact) {
                return Some(format!("contact.{path}"));
            }
        }
        if let Some(terms) = value.get("terms_and_conditions").and_then(Value::as_array) {
            for (index, entry) in terms.iter().enumerate() {
                if let Some(path) = TermsAndConditions::unknown_field(entry) {
                    return Some(format!("terms_and_conditions[{index}].{path}"));
                }
            }
        }
        None
    }
}
