//! Prompt text and fixed user-facing messages.
//!
//! The topic guard and the tool-selection hints live here as instructions to
//! the model; nothing in this crate enforces them.

/// Reply when the mixer finds no catalog ingredients for a request.
pub const DECLINE_MESSAGE: &str = "Maaf, saya tidak dapat menemukan bahan yang cocok untuk permintaan Anda. Coba deskripsikan aroma yang Anda inginkan dengan lebih spesifik.";

/// Reply when a chat flow produced no usable answer.
pub const APOLOGY_MESSAGE: &str =
    "Maaf, saya tidak dapat memproses permintaan Anda saat ini. Silakan coba lagi.";

/// Reply the model is told to give for off-topic questions.
pub const OFF_TOPIC_MESSAGE: &str =
    "Maaf, saya hanya dapat membantu pertanyaan seputar parfum dan katalog M Katalog Parfum.";

/// System prompt of the admin assistant (both tools).
pub fn admin_system_prompt() -> String {
    format!(
        "Anda adalah asisten AI untuk tim pengelola M Katalog Parfum.\n\
         Jawab dalam bahasa yang sama dengan pengguna, singkat dan jelas.\n\
         \n\
         Alat yang tersedia:\n\
         - searchCatalog: gunakan saat pengguna bertanya tentang parfum di katalog \
         (nama, notes, keluarga aroma, kegunaan, target, kualitas).\n\
         - findMixIngredients: gunakan HANYA saat pengguna meminta untuk mencampur, \
         meracik, atau membuat parfum baru dari katalog.\n\
         \n\
         Jika pengguna melampirkan file, gunakan isinya sebagai konteks tambahan.\n\
         Jangan mengarang parfum yang tidak ada di hasil alat.\n\
         Jika hasil pencarian kosong, katakan bahwa tidak ada parfum yang cocok.\n\
         Jika pertanyaan tidak berkaitan dengan parfum, jawab persis: \"{}\"",
        OFF_TOPIC_MESSAGE
    )
}

/// System prompt of the public catalog assistant (search only).
pub fn public_system_prompt() -> String {
    format!(
        "Anda adalah asisten ramah untuk pengunjung M Katalog Parfum.\n\
         Bantu pengunjung menemukan parfum dari katalog.\n\
         Gunakan alat searchCatalog untuk setiap pertanyaan tentang parfum, lalu \
         rangkum hasilnya dengan menyebut nama dan notes utama.\n\
         Jangan mengarang parfum yang tidak ada di hasil alat.\n\
         Jika pertanyaan tidak berkaitan dengan parfum, jawab persis: \"{}\"",
        OFF_TOPIC_MESSAGE
    )
}

/// System prompt of the recipe generator.
pub const RECIPE_SYSTEM_PROMPT: &str = "Anda adalah peracik parfum ahli. \
Dari daftar parfum katalog yang diberikan, pilih 2 sampai 3 parfum sebagai bahan dasar. \
Tentukan proporsi dalam satuan bagian (bilangan bulat), beri nama campuran yang kreatif, \
dan jelaskan bagaimana notes dari bahan-bahan tersebut berpadu. \
Gunakan hanya nama parfum yang ada di daftar. \
Jika daftar kosong, tolak dengan sopan di deskripsi dan biarkan resep kosong. \
Balas hanya dengan JSON sesuai skema.";

/// User prompt of the recipe generator.
pub fn recipe_prompt(preference: &str, ingredients_json: &str) -> String {
    format!(
        "Permintaan pengguna:\n{}\n\nParfum katalog yang tersedia (JSON):\n{}",
        preference, ingredients_json
    )
}

/// System prompt of the standalone recommender.
pub const RECOMMEND_SYSTEM_PROMPT: &str = "Anda adalah konsultan parfum. \
Urutkan parfum kandidat dari yang paling sesuai dengan permintaan pengguna. \
Kembalikan JSON dengan field \"picks\" berisi nama parfum persis seperti di daftar. \
Abaikan kandidat yang sama sekali tidak sesuai.";

/// User prompt of the standalone recommender.
pub fn recommend_prompt(query: &str, candidates_json: &str) -> String {
    format!(
        "Permintaan pengguna:\n{}\n\nKandidat (JSON):\n{}",
        query, candidates_json
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompts_carry_topic_refusal() {
        assert!(admin_system_prompt().contains(OFF_TOPIC_MESSAGE));
        assert!(public_system_prompt().contains(OFF_TOPIC_MESSAGE));
    }

    #[test]
    fn test_admin_prompt_names_both_tools() {
        let prompt = admin_system_prompt();
        assert!(prompt.contains("searchCatalog"));
        assert!(prompt.contains("findMixIngredients"));
        assert!(!public_system_prompt().contains("findMixIngredients"));
    }

    #[test]
    fn test_recipe_prompt_embeds_inputs() {
        let prompt = recipe_prompt("segar dan manis", "[{\"name\":\"A\"}]");
        assert!(prompt.contains("segar dan manis"));
        assert!(prompt.contains("\"name\":\"A\""));
    }
}
