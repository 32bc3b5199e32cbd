pub mod types;
pub mod utils;
pub mod pagination;
pub mod env;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
        let json = serde_json::to_value(&h).unwrap();
        assert_eq!(json["status"], "ok");
    }
}
