pub mod authenticate;
pub mod login_gate;
