//! Rule-based categorization into the site's 25 fixed labels.
//!
//! Categorization is ordered first-match substring matching over the title
//! and summary: vendor rules come first (a story naming both OpenAI and
//! "regulation" files under OpenAI), then topic rules, then a catch-all.
//! The label set is fixed by the front-end's category pages; changing a
//! label here requires a matching change there.

use crate::models::RawArticle;

/// Fallback label when no rule matches.
pub const FALLBACK_CATEGORY: &str = "その他";

/// Ordered rule table: first rule whose patterns hit wins.
///
/// Patterns are matched case-insensitively against title + summary.
const RULES: &[(&str, &[&str])] = &[
    // Vendors first: the most specific signal in a headline
    ("OpenAI", &["openai", "chatgpt", "gpt-4", "gpt-5", "sora", "dall-e"]),
    ("Google", &["google", "gemini", "deepmind", "vertex ai", "notebooklm"]),
    ("Anthropic", &["anthropic", "claude"]),
    ("Meta", &["meta ai", "llama", "meta platforms", "instagram ai", "facebook ai"]),
    ("Microsoft", &["microsoft", "copilot", "azure", "bing"]),
    ("Apple", &["apple", "siri", "apple intelligence"]),
    ("Amazon", &["amazon", "aws", "alexa", "bedrock"]),
    ("NVIDIA", &["nvidia", "cuda", "geforce", "h100", "b200"]),
    // Modalities and applications
    ("画像生成AI", &["image generation", "text-to-image", "stable diffusion", "midjourney", "画像生成"]),
    ("動画生成AI", &["video generation", "text-to-video", "動画生成"]),
    ("音声AI", &["speech", "voice", "text-to-speech", "音声認識", "音声合成", "音声ai"]),
    ("コード生成", &["code generation", "coding assistant", "コード生成", "プログラミング支援"]),
    ("AIエージェント", &["agent", "agentic", "エージェント"]),
    ("LLM・基盤モデル", &["large language model", "foundation model", "llm", "大規模言語モデル", "基盤モデル"]),
    ("ロボティクス", &["robot", "humanoid", "ロボット"]),
    ("自動運転", &["self-driving", "autonomous driving", "autonomous vehicle", "自動運転", "waymo", "tesla fsd"]),
    ("医療・ヘルスケア", &["medical", "health", "drug", "diagnosis", "医療", "ヘルスケア", "創薬", "診断"]),
    ("金融・フィンテック", &["fintech", "banking", "trading", "金融", "フィンテック", "投資信託"]),
    ("教育", &["education", "learning platform", "教育", "学習支援", "eラーニング"]),
    ("セキュリティ", &["security", "deepfake", "vulnerability", "セキュリティ", "ディープフェイク", "サイバー攻撃"]),
    ("規制・政策", &["regulation", "policy", "lawsuit", "copyright", "governance", "規制", "政策", "法案", "著作権", "ai法"]),
    ("研究・論文", &["research", "paper", "arxiv", "study", "benchmark", "研究", "論文"]),
    ("ビジネス・資金調達", &["funding", "raises", "valuation", "ipo", "acquisition", "startup", "資金調達", "買収", "スタートアップ", "上場"]),
    ("オープンソース", &["open source", "open-source", "open weights", "オープンソース", "オープンウェイト"]),
];

/// Assign one of the 25 fixed category labels to an article.
pub fn categorize(article: &RawArticle) -> String {
    let haystack = format!("{} {}", article.title, article.summary).to_lowercase();
    for (label, patterns) in RULES {
        if patterns.iter().any(|p| haystack.contains(p)) {
            return (*label).to_string();
        }
    }
    FALLBACK_CATEGORY.to_string()
}

/// All labels the categorizer can produce, in rule order plus the fallback.
pub fn all_categories() -> Vec<&'static str> {
    RULES
        .iter()
        .map(|(label, _)| *label)
        .chain(std::iter::once(FALLBACK_CATEGORY))
        .collect()
}
