//! Demo records the memory store starts with and the file store writes when
//! its document does not exist yet.

use jiff::{SignedDuration, Timestamp};
use types::{Division, Employee};
use url::Url;
use uuid::Uuid;

pub fn divisions() -> Vec<Division> {
    vec![
        Division::new("teknologi", "Teknologi"),
        Division::new("pemasaran", "Pemasaran"),
        Division::new("sdm", "Sumber Daya Manusia"),
    ]
}

/// `(name, phone, position, division id, avatar colour)`
const EMPLOYEES: &[(&str, &str, &str, &str, &str)] = &[
    ("Budi Santoso", "081234567890", "Frontend Developer", "teknologi", "3498db"),
    ("Siti Aminah", "082345678901", "Backend Developer", "teknologi", "e74c3c"),
    ("Ahmad Yani", "083456789012", "Digital Marketer", "pemasaran", "2ecc71"),
    ("Dewi Lestari", "084567890123", "UI/UX Designer", "teknologi", "f1c40f"),
    ("Eko Prasetyo", "085678901234", "HR Staff", "sdm", "9b59b6"),
    ("Fitriani Indah", "086789012345", "QA Engineer", "teknologi", "1abc9c"),
    ("Gilang Pratama", "087890123456", "Data Analyst", "pemasaran", "e67e22"),
];

pub fn employees() -> Vec<Employee> {
    let divisions = divisions();
    let now = Timestamp::now();
    let count = EMPLOYEES.len() as i64;

    EMPLOYEES
        .iter()
        .zip(0i64..)
        .map(|(&(name, phone, position, division, colour), i)| {
            let initial = name.chars().next().unwrap_or('?');
            Employee {
                id: Uuid::now_v7(),
                name: name.into(),
                phone: phone.into(),
                position: position.into(),
                division: divisions.iter().find(|d| d.id == division).cloned(),
                image: Url::parse(&format!(
                    "https://placehold.co/40x40/{colour}/ffffff?text={initial}"
                ))
                .ok(),
                // One day apart, oldest first.
                created_at: now - SignedDuration::from_hours(24 * (count - i)),
            }
        })
        .collect()
}
