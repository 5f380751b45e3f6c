//! Generate a deterministic `metadata_sample.csv` for trying out pubscope.
//!
//! The output mimics the messiness of real publication metadata: blank
//! titles, missing journals, partial and garbage dates, absent abstracts.

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    fn range(&mut self, lo: u64, hi: u64) -> u64 {
        lo + self.next_u64() % (hi - lo + 1)
    }
}

const SUBJECTS: &[&str] = &[
    "Transmission", "Vaccination", "Serology", "Ventilation", "Mask Usage", "Viral Load",
    "Antibody Response", "Contact Tracing", "Aerosol Spread", "Mortality",
];

const QUALIFIERS: &[&str] = &[
    "in Hospital Wards", "among Healthcare Workers", "in Urban Populations",
    "during Lockdown", "in Pediatric Patients", "across Age Groups", "under Quarantine",
];

const KINDS: &[&str] = &["Study", "Analysis", "Review", "Report", "Trial", "Survey"];

const JOURNALS: &[&str] = &[
    "Nature", "The Lancet", "BMJ", "JAMA", "Cell", "PLOS ONE", "NEJM", "Science",
];

const SOURCES: &[&str] = &["PMC", "WHO", "Elsevier", "medRxiv", "bioRxiv"];

const SURNAMES: &[&str] = &[
    "Okafor", "Lindqvist", "Moreau", "Tanaka", "Alvarez", "Novak", "Petrov", "Singh",
];

const ABSTRACT_SNIPPETS: &[&str] = &[
    "We report observational findings from a regional cohort.",
    "Results suggest a measurable effect across the studied period.",
    "A retrospective review of admission records was performed.",
    "Sampling covered three waves of the outbreak.",
];

fn make_date(rng: &mut SimpleRng) -> String {
    let year = rng.range(2019, 2022);
    match rng.next_u64() % 10 {
        // Most rows carry a full ISO date.
        0..=5 => format!("{year}-{:02}-{:02}", rng.range(1, 12), rng.range(1, 28)),
        6 => format!("{year}-{:02}", rng.range(1, 12)),
        7 => year.to_string(),
        8 => "not-a-date".to_string(),
        _ => String::new(),
    }
}

fn main() -> anyhow::Result<()> {
    let mut rng = SimpleRng::new(42);
    let path = "metadata_sample.csv";

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "cord_uid",
        "title",
        "authors",
        "journal",
        "publish_time",
        "abstract",
        "source_x",
    ])?;

    let rows = 500;
    for i in 0..rows {
        let title = if rng.chance(0.04) {
            String::new()
        } else {
            format!(
                "{} {} {}",
                rng.pick(SUBJECTS),
                rng.pick(KINDS),
                rng.pick(QUALIFIERS)
            )
        };
        let authors = if rng.chance(0.1) {
            String::new()
        } else {
            format!("{}, A; {}, B", rng.pick(SURNAMES), rng.pick(SURNAMES))
        };
        let journal = if rng.chance(0.15) {
            ""
        } else {
            *rng.pick(JOURNALS)
        };
        let abstract_text = if rng.chance(0.2) {
            ""
        } else {
            *rng.pick(ABSTRACT_SNIPPETS)
        };
        let source = if rng.chance(0.1) { "" } else { *rng.pick(SOURCES) };

        writer.write_record([
            format!("sample{i:04}").as_str(),
            title.as_str(),
            authors.as_str(),
            journal,
            make_date(&mut rng).as_str(),
            abstract_text,
            source,
        ])?;
    }
    writer.flush()?;

    println!("wrote {rows} rows to {path}");
    Ok(())
}
