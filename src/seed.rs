//! System-content seeding. Inserts the built-in curriculum domains on first
//! boot; reruns are no-ops. Word ids are UUIDv5 of a stable key so reseeding a
//! wiped database produces the same graph.

use chrono::Utc;
use sqlx::Row;
use uuid::Uuid;

use crate::db::DatabaseProxy;

struct SeedTranslation {
    language: &'static str,
    text: &'static str,
    phonetic: &'static str,
    example: &'static str,
}

struct SeedWord {
    key: &'static str,
    difficulty: &'static str,
    sort_order: i32,
    translations: &'static [SeedTranslation],
    prerequisites: &'static [&'static str],
}

struct SeedDomain {
    name: &'static str,
    description: &'static str,
    color: &'static str,
    words: &'static [SeedWord],
}

const ANIMALS: &[SeedWord] = &[
    SeedWord {
        key: "word-dog",
        difficulty: "beginner",
        sort_order: 1,
        translations: &[
            SeedTranslation { language: "en", text: "Dog", phonetic: "/dɔːɡ/", example: "The dog is playing." },
            SeedTranslation { language: "pl", text: "Pies", phonetic: "/pjɛs/", example: "Pies biega po trawie." },
            SeedTranslation { language: "es", text: "Perro", phonetic: "/ˈpe.ro/", example: "El perro está jugando." },
        ],
        prerequisites: &[],
    },
    SeedWord {
        key: "word-cat",
        difficulty: "beginner",
        sort_order: 2,
        translations: &[
            SeedTranslation { language: "en", text: "Cat", phonetic: "/kæt/", example: "The cat sleeps." },
            SeedTranslation { language: "pl", text: "Kot", phonetic: "/kɔt/", example: "Kot śpi na kanapie." },
            SeedTranslation { language: "es", text: "Gato", phonetic: "/ˈɡa.to/", example: "El gato está durmiendo." },
        ],
        prerequisites: &[],
    },
    SeedWord {
        key: "word-bird",
        difficulty: "beginner",
        sort_order: 3,
        translations: &[
            SeedTranslation { language: "en", text: "Bird", phonetic: "/bɜːrd/", example: "I see a bird." },
            SeedTranslation { language: "pl", text: "Ptak", phonetic: "/ptak/", example: "Widzę ptaka." },
            SeedTranslation { language: "es", text: "Pájaro", phonetic: "/ˈpa.ʝa.ɾo/", example: "Veo un pájaro." },
        ],
        prerequisites: &[],
    },
    SeedWord {
        key: "word-fish",
        difficulty: "beginner",
        sort_order: 4,
        translations: &[
            SeedTranslation { language: "en", text: "Fish", phonetic: "/fɪʃ/", example: "Fish swim in water." },
            SeedTranslation { language: "pl", text: "Ryba", phonetic: "/ˈrɨ.ba/", example: "Ryby pływają w wodzie." },
            SeedTranslation { language: "es", text: "Pez", phonetic: "/peθ/", example: "Los peces nadan en el agua." },
        ],
        prerequisites: &[],
    },
    SeedWord {
        key: "word-rabbit",
        difficulty: "intermediate",
        sort_order: 5,
        translations: &[
            SeedTranslation { language: "en", text: "Rabbit", phonetic: "/ˈræbɪt/", example: "The rabbit has long ears." },
            SeedTranslation { language: "pl", text: "Królik", phonetic: "/ˈkrɔ.lik/", example: "Królik ma długie uszy." },
            SeedTranslation { language: "es", text: "Conejo", phonetic: "/koˈne.xo/", example: "El conejo tiene orejas largas." },
        ],
        prerequisites: &["word-cat", "word-fish"],
    },
    SeedWord {
        key: "word-squirrel",
        difficulty: "intermediate",
        sort_order: 6,
        translations: &[
            SeedTranslation { language: "en", text: "Squirrel", phonetic: "/ˈskwɪrəl/", example: "The squirrel climbs trees." },
            SeedTranslation { language: "pl", text: "Wiewiórka", phonetic: "/vʲɛˈvjuːrka/", example: "Wiewiórka wspina się na drzewa." },
            SeedTranslation { language: "es", text: "Ardilla", phonetic: "/aɾˈðiʎa/", example: "La ardilla trepa árboles." },
        ],
        prerequisites: &["word-bird", "word-cat"],
    },
    SeedWord {
        key: "word-horse",
        difficulty: "intermediate",
        sort_order: 7,
        translations: &[
            SeedTranslation { language: "en", text: "Horse", phonetic: "/hɔːrs/", example: "Horses run fast." },
            SeedTranslation { language: "pl", text: "Koń", phonetic: "/kɔɲ/", example: "Konie biegną szybko." },
            SeedTranslation { language: "es", text: "Caballo", phonetic: "/kaˈbaʎo/", example: "Los caballos corren rápido." },
        ],
        prerequisites: &["word-dog"],
    },
    SeedWord {
        key: "word-cow",
        difficulty: "intermediate",
        sort_order: 8,
        translations: &[
            SeedTranslation { language: "en", text: "Cow", phonetic: "/kaʊ/", example: "Cows give milk." },
            SeedTranslation { language: "pl", text: "Krowa", phonetic: "/ˈkrɔ.va/", example: "Krowy dają mleko." },
            SeedTranslation { language: "es", text: "Vaca", phonetic: "/ˈba.ka/", example: "Las vacas dan leche." },
        ],
        prerequisites: &["word-horse"],
    },
    SeedWord {
        key: "word-hedgehog",
        difficulty: "advanced",
        sort_order: 9,
        translations: &[
            SeedTranslation { language: "en", text: "Hedgehog", phonetic: "/ˈhedʒhɒɡ/", example: "The hedgehog has spines." },
            SeedTranslation { language: "pl", text: "Jeż", phonetic: "/jɛʂ/", example: "Jeż ma kolce." },
            SeedTranslation { language: "es", text: "Erizo", phonetic: "/eˈɾi.θo/", example: "El erizo tiene púas." },
        ],
        prerequisites: &["word-rabbit", "word-squirrel"],
    },
    SeedWord {
        key: "word-fox",
        difficulty: "advanced",
        sort_order: 10,
        translations: &[
            SeedTranslation { language: "en", text: "Fox", phonetic: "/fɒks/", example: "The fox is clever." },
            SeedTranslation { language: "pl", text: "Lis", phonetic: "/lʲis/", example: "Lis jest sprytny." },
            SeedTranslation { language: "es", text: "Zorro", phonetic: "/ˈso.ro/", example: "El zorro es astuto." },
        ],
        prerequisites: &["word-squirrel", "word-hedgehog"],
    },
];

const FOOD_AND_HOME: &[SeedWord] = &[
    SeedWord {
        key: "word-apple",
        difficulty: "beginner",
        sort_order: 1,
        translations: &[
            SeedTranslation { language: "en", text: "Apple", phonetic: "/ˈæpl/", example: "I eat an apple." },
            SeedTranslation { language: "pl", text: "Jabłko", phonetic: "/ˈjab.wkɔ/", example: "Jem jabłko." },
            SeedTranslation { language: "es", text: "Manzana", phonetic: "/manˈθa.na/", example: "Como una manzana." },
        ],
        prerequisites: &[],
    },
    SeedWord {
        key: "word-bread",
        difficulty: "beginner",
        sort_order: 2,
        translations: &[
            SeedTranslation { language: "en", text: "Bread", phonetic: "/bred/", example: "I like bread." },
            SeedTranslation { language: "pl", text: "Chleb", phonetic: "/xlɛp/", example: "Lubię chleb." },
            SeedTranslation { language: "es", text: "Pan", phonetic: "/pan/", example: "Me gusta el pan." },
        ],
        prerequisites: &[],
    },
    SeedWord {
        key: "word-milk",
        difficulty: "beginner",
        sort_order: 3,
        translations: &[
            SeedTranslation { language: "en", text: "Milk", phonetic: "/mɪlk/", example: "I drink milk." },
            SeedTranslation { language: "pl", text: "Mleko", phonetic: "/ˈmlɛ.kɔ/", example: "Piję mleko." },
            SeedTranslation { language: "es", text: "Leche", phonetic: "/ˈle.tʃe/", example: "Bebo leche." },
        ],
        prerequisites: &[],
    },
    SeedWord {
        key: "word-water",
        difficulty: "beginner",
        sort_order: 4,
        translations: &[
            SeedTranslation { language: "en", text: "Water", phonetic: "/ˈwɔːtər/", example: "Water is good." },
            SeedTranslation { language: "pl", text: "Woda", phonetic: "/ˈvɔ.da/", example: "Woda jest dobra." },
            SeedTranslation { language: "es", text: "Agua", phonetic: "/ˈa.ɣwa/", example: "El agua es buena." },
        ],
        prerequisites: &[],
    },
    SeedWord {
        key: "word-chair",
        difficulty: "beginner",
        sort_order: 5,
        translations: &[
            SeedTranslation { language: "en", text: "Chair", phonetic: "/tʃɛr/", example: "I sit on a chair." },
            SeedTranslation { language: "pl", text: "Krzesło", phonetic: "/ˈkʂɛ.swɔ/", example: "Siedzę na krześle." },
            SeedTranslation { language: "es", text: "Silla", phonetic: "/ˈsiʎa/", example: "Me siento en una silla." },
        ],
        prerequisites: &[],
    },
    SeedWord {
        key: "word-table",
        difficulty: "beginner",
        sort_order: 6,
        translations: &[
            SeedTranslation { language: "en", text: "Table", phonetic: "/ˈteɪbəl/", example: "The plate is on the table." },
            SeedTranslation { language: "pl", text: "Stół", phonetic: "/stuw/", example: "Talerz jest na stole." },
            SeedTranslation { language: "es", text: "Mesa", phonetic: "/ˈme.sa/", example: "El plato está en la mesa." },
        ],
        prerequisites: &[],
    },
    SeedWord {
        key: "word-breakfast",
        difficulty: "intermediate",
        sort_order: 7,
        translations: &[
            SeedTranslation { language: "en", text: "Breakfast", phonetic: "/ˈbrekfəst/", example: "I eat breakfast in the morning." },
            SeedTranslation { language: "pl", text: "Śniadanie", phonetic: "/ˈɲa.daɲɛ/", example: "Jem śniadanie rano." },
            SeedTranslation { language: "es", text: "Desayuno", phonetic: "/de.saˈʝu.no/", example: "Como desayuno por la mañana." },
        ],
        prerequisites: &["word-bread", "word-milk", "word-apple"],
    },
    SeedWord {
        key: "word-cheese",
        difficulty: "intermediate",
        sort_order: 8,
        translations: &[
            SeedTranslation { language: "en", text: "Cheese", phonetic: "/tʃiːz/", example: "I like cheese on bread." },
            SeedTranslation { language: "pl", text: "Ser", phonetic: "/sɛr/", example: "Lubię ser na chlebie." },
            SeedTranslation { language: "es", text: "Queso", phonetic: "/ˈke.so/", example: "Me gusta el queso en el pan." },
        ],
        prerequisites: &["word-bread", "word-milk"],
    },
    SeedWord {
        key: "word-kitchen",
        difficulty: "intermediate",
        sort_order: 9,
        translations: &[
            SeedTranslation { language: "en", text: "Kitchen", phonetic: "/ˈkɪtʃən/", example: "We cook in the kitchen." },
            SeedTranslation { language: "pl", text: "Kuchnia", phonetic: "/ˈkuxɲa/", example: "Gotujemy w kuchni." },
            SeedTranslation { language: "es", text: "Cocina", phonetic: "/koˈθi.na/", example: "Cocinamos en la cocina." },
        ],
        prerequisites: &["word-table", "word-chair"],
    },
    SeedWord {
        key: "word-refrigerator",
        difficulty: "advanced",
        sort_order: 10,
        translations: &[
            SeedTranslation { language: "en", text: "Refrigerator", phonetic: "/rɪˈfrɪdʒəreɪtər/", example: "The food is cold in the refrigerator." },
            SeedTranslation { language: "pl", text: "Lodówka", phonetic: "/lɔˈdɔf.ka/", example: "Jedzenie jest zimne w lodówce." },
            SeedTranslation { language: "es", text: "Refrigerador", phonetic: "/ref.ɾi.xe.ɾaˈðoɾ/", example: "La comida está fría en el refrigerador." },
        ],
        prerequisites: &["word-kitchen", "word-milk", "word-cheese"],
    },
];

const DOMAINS: &[SeedDomain] = &[
    SeedDomain {
        name: "Animals",
        description: "Learn animal names from pets to wildlife",
        color: "#4CAF50",
        words: ANIMALS,
    },
    SeedDomain {
        name: "Food & Home",
        description: "Learn about food and household items",
        color: "#FF9800",
        words: FOOD_AND_HOME,
    },
];

fn word_id(key: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_DNS, key.as_bytes())
}

pub async fn seed_system_domains(proxy: &DatabaseProxy) -> Result<(), sqlx::Error> {
    let pool = proxy.pool();

    let existing = sqlx::query(r#"SELECT id FROM domains WHERE is_system = TRUE LIMIT 1"#)
        .fetch_optional(pool)
        .await?;
    if let Some(row) = existing {
        let id: Uuid = row.try_get("id")?;
        tracing::debug!(domain_id = %id, "system domains already seeded");
        return Ok(());
    }

    let now = Utc::now().naive_utc();

    for domain in DOMAINS {
        let domain_id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO domains (id, user_id, name, description, icon, color, is_system, created_at, updated_at)
            VALUES ($1, NULL, $2, $3, NULL, $4, TRUE, $5, $5)
            "#,
        )
        .bind(domain_id)
        .bind(domain.name)
        .bind(domain.description)
        .bind(domain.color)
        .bind(now)
        .execute(pool)
        .await?;

        for word in domain.words {
            sqlx::query(
                r#"
                INSERT INTO words (id, domain_id, difficulty, sort_order, is_active, created_at)
                VALUES ($1, $2, $3, $4, TRUE, $5)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(word_id(word.key))
            .bind(domain_id)
            .bind(word.difficulty)
            .bind(word.sort_order)
            .bind(now)
            .execute(pool)
            .await?;

            for translation in word.translations {
                sqlx::query(
                    r#"
                    INSERT INTO word_translations (id, word_id, language, text, phonetic, example_sentence, created_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7)
                    ON CONFLICT (word_id, language) DO NOTHING
                    "#,
                )
                .bind(Uuid::new_v4())
                .bind(word_id(word.key))
                .bind(translation.language)
                .bind(translation.text)
                .bind(translation.phonetic)
                .bind(translation.example)
                .bind(now)
                .execute(pool)
                .await?;
            }

            for prerequisite in word.prerequisites {
                sqlx::query(
                    r#"
                    INSERT INTO word_prerequisites (id, word_id, prerequisite_id, created_at)
                    VALUES ($1, $2, $3, $4)
                    ON CONFLICT (word_id, prerequisite_id) DO NOTHING
                    "#,
                )
                .bind(Uuid::new_v4())
                .bind(word_id(word.key))
                .bind(word_id(prerequisite))
                .bind(now)
                .execute(pool)
                .await?;
            }
        }

        tracing::info!(
            domain = domain.name,
            words = domain.words.len(),
            "seeded system domain"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::graph::DomainGraph;

    #[test]
    fn test_word_ids_are_stable() {
        assert_eq!(word_id("word-dog"), word_id("word-dog"));
        assert_ne!(word_id("word-dog"), word_id("word-cat"));
    }

    #[test]
    fn test_prerequisites_reference_seeded_words() {
        for domain in DOMAINS {
            let keys: Vec<&str> = domain.words.iter().map(|w| w.key).collect();
            for word in domain.words {
                for prerequisite in word.prerequisites {
                    assert!(
                        keys.contains(prerequisite),
                        "{} references unseeded {}",
                        word.key,
                        prerequisite
                    );
                }
            }
        }
    }

    #[test]
    fn test_seed_graphs_are_acyclic() {
        for domain in DOMAINS {
            let ids: Vec<Uuid> = domain.words.iter().map(|w| word_id(w.key)).collect();
            let edges: Vec<(Uuid, Uuid)> = domain
                .words
                .iter()
                .flat_map(|w| {
                    w.prerequisites
                        .iter()
                        .map(|p| (word_id(w.key), word_id(p)))
                })
                .collect();
            let graph = DomainGraph::new(&ids, &edges).expect("seed edges are valid");
            graph.depths().expect("seed graph has no cycles");
        }
    }
}
