//! User-facing messages (German, as shown in the portal UI)

pub const WRONG_API_USAGE: &str =
    "Ungültiger API-Aufruf: Die Argumente stimmen nicht mit der Definition überein";
pub const GENERIC_API_ERROR: &str =
    "Fehler beim Aufruf der OpenShift-API. Bitte versuche es später erneut";

pub const PROJECT_NAME_REQUIRED: &str = "Projektname muss angegeben werden";
pub const BILLING_REQUIRED: &str = "Kontierungsnummer muss angegeben werden";
pub const PROJECT_EXISTS: &str = "Das Projekt existiert bereits";
pub const PROJECT_NOT_FOUND: &str = "Das Projekt existiert nicht oder ist nicht erreichbar";
pub const QUOTA_NOT_FOUND: &str = "Für das Projekt ist keine Quota definiert";

pub const PROJECT_CREATED: &str = "Das Projekt wurde erstellt";
pub const TEST_PROJECT_CREATED: &str = "Das Test-Projekt wurde erstellt";
pub const DATA_SAVED: &str = "Die neuen Daten wurden gespeichert";
pub const QUOTAS_SAVED: &str = "Die neuen Quotas wurden gespeichert";

pub const NOT_AUTHENTICATED: &str = "Du bist nicht angemeldet";

pub fn no_admin_rights(admins: &[String]) -> String {
    format!(
        "Du hast keine Admin-Rechte auf dem Projekt. Bestehende Admins sind folgende Benutzer: {}",
        admins.join(", ")
    )
}

pub fn max_cpu_exceeded(max_cpu: u32) -> String {
    format!("Es können maximal {} CPU Cores vergeben werden", max_cpu)
}

pub fn max_memory_exceeded(max_memory: u32) -> String {
    format!("Es können maximal {}GB Memory vergeben werden", max_memory)
}

pub fn current_billing(billing: &str) -> String {
    format!("Aktuelle Kontierungsnummer: {}", billing)
}
