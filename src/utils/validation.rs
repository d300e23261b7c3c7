use regex::Regex;

pub fn is_valid_username(name: &str) -> bool {
    let re = Regex::new(r"^[a-zA-Z0-9_][a-zA-Z0-9._-]{0,31}$").unwrap();
    re.is_match(name)
}

pub fn is_valid_email(email: &str) -> bool {
    let re = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    re.is_match(email)
}
