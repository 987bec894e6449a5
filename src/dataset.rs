// ABOUTME: Static content for the craniofacial syndromes deck
// ABOUTME: Holds syndrome records, lookup-title overrides and the fixed reference strings

/// One syndrome's slide content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyndromeRecord {
    pub name: &'static str,
    pub description: &'static str,
    /// Anesthesia considerations, in presentation order
    pub anesthesia: &'static [&'static str],
    /// Direct image URL tried before the lookup service
    pub image_url: Option<&'static str>,
    pub image_caption: &'static str,
}

impl SyndromeRecord {
    /// Local file name for this record's downloaded image.
    ///
    /// Lower-cased, spaces become `_` and slashes become `-`.
    pub fn image_file_name(&self) -> String {
        format!(
            "{}.jpg",
            self.name.to_lowercase().replace(' ', "_").replace('/', "-")
        )
    }

    /// Title queried against the lookup service.
    pub fn lookup_title(&self) -> &'static str {
        LOOKUP_TITLES
            .iter()
            .find(|(name, _)| *name == self.name)
            .map(|(_, title)| *title)
            .unwrap_or(self.name)
    }
}

pub const DECK_TITLE: &str = "Pediatric Craniofacial Syndromes";
pub const DECK_SUBTITLE: &str = "Key types, features, and anesthesia considerations";
pub const REFERENCES_TITLE: &str = "References";

/// Appended after the per-image entries, in this order.
pub const GENERAL_REFERENCES: [&str; 2] = [
    "General references: IntechOpen, Medscape, NCBI Bookshelf, ClinicalGate, Aneskey",
    "Always verify local protocols and latest guidelines",
];

/// Display name to article title, where the two differ in case or punctuation.
pub static LOOKUP_TITLES: &[(&str, &str)] = &[
    ("Apert Syndrome", "Apert syndrome"),
    ("Crouzon Syndrome", "Crouzon syndrome"),
    ("Pfeiffer Syndrome", "Pfeiffer syndrome"),
    ("Saethre-Chotzen Syndrome", "Saethre\u{2013}Chotzen syndrome"),
    ("Carpenter Syndrome", "Carpenter syndrome"),
    ("Muenke Syndrome", "Muenke syndrome"),
    ("Treacher Collins Syndrome", "Treacher Collins syndrome"),
    ("Pierre Robin Sequence", "Pierre Robin sequence"),
    ("Hemifacial Microsomia / Goldenhar", "Hemifacial microsomia"),
    ("Freeman-Sheldon Syndrome", "Freeman\u{2013}Sheldon syndrome"),
];

pub static SYNDROMES: &[SyndromeRecord] = &[
    SyndromeRecord {
        name: "Apert Syndrome",
        description: "Craniosynostosis with turribrachycephaly, midface hypoplasia, syndactyly; possible cleft palate.",
        anesthesia: &[
            "Anticipate difficult mask/intubation (midface hypoplasia, choanal atresia)",
            "Screen for CHD; manage ICP if present",
            "Eye protection for proptosis; careful positioning",
        ],
        image_url: None,
        image_caption: "Apert syndrome: syndactyly (Wikimedia Commons)",
    },
    SyndromeRecord {
        name: "Crouzon Syndrome",
        description: "Craniosynostosis, midface hypoplasia, beaked nose, proptosis; no limb anomalies.",
        anesthesia: &[
            "Potential difficult airway; consider fiberoptic",
            "Monitor for increased ICP",
            "Eye protection due to proptosis",
        ],
        image_url: None,
        image_caption: "Crouzon syndrome (Wikimedia Commons)",
    },
    SyndromeRecord {
        name: "Pfeiffer Syndrome",
        description: "Craniosynostosis with midface hypoplasia; broad, medially deviated thumbs/toes.",
        anesthesia: &[
            "Airway obstruction risk; prepare for difficult intubation",
            "Assess for CHD and increased ICP",
            "Careful positioning and eye protection",
        ],
        image_url: None,
        image_caption: "Pfeiffer syndrome (Wikimedia Commons)",
    },
    SyndromeRecord {
        name: "Saethre-Chotzen Syndrome",
        description: "Craniosynostosis, facial asymmetry, ptosis, mild syndactyly.",
        anesthesia: &[
            "Airway usually manageable; assess individually",
            "Monitor for ICP and hearing issues",
            "IV access may be challenging with limb anomalies",
        ],
        image_url: None,
        image_caption: "Saethre-Chotzen syndrome (Wikimedia Commons)",
    },
    SyndromeRecord {
        name: "Carpenter Syndrome",
        description: "Craniosynostosis, syndactyly/polydactyly, obesity; developmental delay.",
        anesthesia: &[
            "Difficult ventilation/intubation (midface hypoplasia, obesity)",
            "Cardiac defects common; evaluate preop",
            "Positioning challenges due to habitus and limbs",
        ],
        image_url: None,
        image_caption: "Carpenter syndrome (Wikimedia Commons)",
    },
    SyndromeRecord {
        name: "Muenke Syndrome",
        description: "Coronal craniosynostosis, brachycephaly, midface hypoplasia, hearing loss.",
        anesthesia: &[
            "Prepare for potential difficult airway",
            "Assess hearing/communication needs",
            "Monitor for signs of ICP",
        ],
        image_url: None,
        image_caption: "Muenke syndrome (Wikimedia Commons)",
    },
    SyndromeRecord {
        name: "Treacher Collins Syndrome",
        description: "Mandibulofacial dysostosis: mandibular/malar hypoplasia, downward palpebral fissures, ear anomalies; cleft palate common.",
        anesthesia: &[
            "Very difficult airway; fiberoptic or video techniques",
            "Consider postoperative airway obstruction; extended monitoring",
            "Address hearing impairment communication",
        ],
        image_url: None,
        image_caption: "Treacher Collins syndrome (Wikimedia Commons)",
    },
    SyndromeRecord {
        name: "Pierre Robin Sequence",
        description: "Triad: micrognathia, glossoptosis, cleft palate; significant airway obstruction.",
        anesthesia: &[
            "Maintain spontaneous ventilation until airway secured",
            "Prepare for difficult intubation; alternative airways",
            "Postop monitoring for obstruction",
        ],
        image_url: None,
        image_caption: "Pierre Robin sequence (Wikimedia Commons)",
    },
    SyndromeRecord {
        name: "Hemifacial Microsomia / Goldenhar",
        description: "Unilateral facial underdevelopment; ear anomalies; vertebral +/- cardiac defects.",
        anesthesia: &[
            "Difficult intubation due to asymmetry/mandibular hypoplasia",
            "Evaluate cardiac/vertebral anomalies",
            "Careful positioning and padding",
        ],
        image_url: None,
        image_caption: "Hemifacial microsomia (Wikimedia Commons)",
    },
    SyndromeRecord {
        name: "Freeman-Sheldon Syndrome",
        description: "Whistling face: microstomia, pursed lips; limb contractures; scoliosis.",
        anesthesia: &[
            "Extremely difficult airway; microstomia",
            "Positioning challenges; consider MH risk per institutional protocol",
            "Plan postoperative respiratory support",
        ],
        image_url: None,
        image_caption: "Freeman-Sheldon syndrome (Wikimedia Commons)",
    },
];

/// Reference line citing the image used for a record.
pub fn reference_entry(name: &str, source: &str) -> String {
    format!("Image: {} \u{2014} {}", name, source)
}
