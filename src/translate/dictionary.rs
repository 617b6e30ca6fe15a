//! Dictionary fallback translation.
//!
//! This is not a real translator. It is a hand-built regex substitution table
//! that swaps well-known English AI/news vocabulary for Japanese equivalents,
//! leaving everything else (including word order) alone. The output is rough
//! but readable enough for a headline list, and it requires no API key and
//! never fails. Phrases sit before single words in the table so
//! "machine learning" wins over "learning".

use once_cell::sync::Lazy;
use regex::Regex;

/// (pattern, replacement) pairs, applied in order. Patterns are
/// case-insensitive and word-bounded.
const TABLE: &[(&str, &str)] = &[
    // Multi-word phrases first
    ("artificial intelligence", "人工知能"),
    ("machine learning", "機械学習"),
    ("deep learning", "深層学習"),
    ("neural networks?", "ニューラルネットワーク"),
    ("large language models?", "大規模言語モデル"),
    ("foundation models?", "基盤モデル"),
    ("generative ai", "生成AI"),
    ("image generation", "画像生成"),
    ("video generation", "動画生成"),
    ("text-to-image", "画像生成"),
    ("text-to-video", "動画生成"),
    ("speech recognition", "音声認識"),
    ("open[ -]source", "オープンソース"),
    ("open weights", "オープンウェイト"),
    ("self-driving", "自動運転の"),
    ("autonomous driving", "自動運転"),
    ("data centers?", "データセンター"),
    ("computer vision", "コンピュータビジョン"),
    ("reinforcement learning", "強化学習"),
    // Verbs / announcement language
    ("announce[sd]?", "発表"),
    ("release[sd]?", "リリース"),
    ("launch(es|ed)?", "開始"),
    ("unveil(s|ed)?", "公開"),
    ("introduce[sd]?", "導入"),
    ("acquire[sd]?", "買収"),
    ("partners? with", "提携："),
    ("raises", "資金調達："),
    // Nouns
    ("chatbots?", "チャットボット"),
    ("agents?", "エージェント"),
    ("robots?", "ロボット"),
    ("models?", "モデル"),
    ("benchmarks?", "ベンチマーク"),
    ("researchers?", "研究者"),
    ("research", "研究"),
    ("papers?", "論文"),
    ("reports?", "レポート"),
    ("updates?", "アップデート"),
    ("features?", "機能"),
    ("users?", "ユーザー"),
    ("developers?", "開発者"),
    ("companies", "企業"),
    ("company", "企業"),
    ("startups?", "スタートアップ"),
    ("funding", "資金調達"),
    ("billion", "十億"),
    ("million", "百万"),
    ("regulations?", "規制"),
    ("lawsuits?", "訴訟"),
    ("copyright", "著作権"),
    ("governments?", "政府"),
    ("safety", "安全性"),
    ("security", "セキュリティ"),
    ("privacy", "プライバシー"),
    ("tools?", "ツール"),
    ("platforms?", "プラットフォーム"),
    ("services?", "サービス"),
    ("technolog(y|ies)", "技術"),
    ("performance", "性能"),
    ("voice", "音声"),
    ("videos?", "動画"),
    ("images?", "画像"),
    ("search", "検索"),
    ("cloud", "クラウド"),
    ("data", "データ"),
    ("free", "無料"),
    ("available", "利用可能"),
    // Adjectives / misc
    ("new", "新しい"),
    ("latest", "最新の"),
    ("major", "大型の"),
    ("breaking", "速報："),
];

static COMPILED: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    TABLE
        .iter()
        .map(|(pat, rep)| {
            let re = Regex::new(&format!(r"(?i)\b(?:{})\b", pat))
                .unwrap_or_else(|e| panic!("bad dictionary pattern {pat:?}: {e}"));
            (re, *rep)
        })
        .collect()
});

/// Apply the substitution table to a piece of English text.
///
/// Text that is already Japanese should be passed through by the caller
/// instead; this function always substitutes.
pub fn translate(text: &str) -> String {
    let mut out = text.to_string();
    for (re, rep) in COMPILED.iter() {
        out = re.replace_all(&out, *rep).into_owned();
    }
    out
}
