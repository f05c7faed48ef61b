//! Industry lab detection and ordering.
//!
//! A paper is attributed to a company when any keyword from [`INDUSTRY_KEYWORDS`]
//! appears in its affiliations, comment, or abstract. Matching is plain
//! case-insensitive substring containment with no word-boundary check, so a
//! short keyword can match inside an unrelated word (`meta` in "metadata").
//! That is an accepted limitation of the heuristic.

use crate::models::Paper;
use crate::utils::title_case;

/// A keyword and the company it is reported as.
///
/// `display: None` reports the title-cased keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndustryKeyword {
    pub keyword: &'static str,
    pub display: Option<&'static str>,
}

const fn kw(keyword: &'static str, display: &'static str) -> IndustryKeyword {
    IndustryKeyword {
        keyword,
        display: Some(display),
    }
}

/// Ordered keyword table; the first keyword found in the text wins.
pub const INDUSTRY_KEYWORDS: &[IndustryKeyword] = &[
    // Chinese internet
    kw("alibaba", "Alibaba"),
    kw("taobao", "Alibaba"),
    kw("alimama", "Alibaba"),
    kw("ant group", "Alibaba"),
    kw("damo academy", "Alibaba"),
    kw("tencent", "Tencent"),
    kw("wechat", "Tencent"),
    kw("weixin", "Tencent"),
    kw("bytedance", "ByteDance"),
    kw("tiktok", "ByteDance"),
    kw("douyin", "ByteDance"),
    kw("baidu", "Baidu"),
    kw("jd.com", "JD.com"),
    kw("jingdong", "JD.com"),
    kw("京东", "JD.com"),
    kw("meituan", "Meituan"),
    kw("美团", "Meituan"),
    kw("kuaishou", "Kuaishou"),
    kw("快手", "Kuaishou"),
    kw("huawei", "Huawei"),
    kw("noah's ark", "Huawei"),
    kw("xiaomi", "Xiaomi"),
    kw("shopee", "Shopee"),
    kw("sea group", "Shopee"),
    kw("garena", "Shopee"),
    kw("pinduoduo", "Pinduoduo"),
    kw("拼多多", "Pinduoduo"),
    kw("netease", "NetEase"),
    kw("网易", "NetEase"),
    kw("didi", "DiDi"),
    kw("滴滴", "DiDi"),
    kw("bilibili", "Bilibili"),
    // US internet
    kw("google", "Google"),
    kw("deepmind", "Google"),
    kw("youtube", "Google"),
    kw("alphabet", "Google"),
    kw("meta", "Meta"),
    kw("facebook", "Meta"),
    kw("instagram", "Meta"),
    kw("amazon", "Amazon"),
    kw("aws", "Amazon"),
    kw("microsoft", "Microsoft"),
    kw("bing", "Microsoft"),
    kw("linkedin", "Microsoft"),
    kw("apple", "Apple"),
    kw("netflix", "Netflix"),
    kw("spotify", "Spotify"),
    kw("twitter", "Twitter/X"),
    IndustryKeyword {
        keyword: "x.com",
        display: None,
    },
    kw("pinterest", "Pinterest"),
    kw("uber", "Uber"),
    kw("airbnb", "Airbnb"),
    kw("ebay", "eBay"),
    kw("snap", "Snap"),
    kw("snapchat", "Snap"),
    kw("nvidia", "NVIDIA"),
    kw("openai", "OpenAI"),
    kw("salesforce", "Salesforce"),
    // Other
    kw("samsung", "Samsung"),
    kw("naver", "Naver"),
    kw("kakao", "Kakao"),
    kw("rakuten", "Rakuten"),
    kw("yahoo", "Yahoo"),
];

impl IndustryKeyword {
    /// Company name reported for this keyword.
    pub fn display_name(&self) -> String {
        match self.display {
            Some(name) => name.to_string(),
            None => title_case(self.keyword),
        }
    }
}

/// Return the company credited for a paper, or an empty string.
///
/// The searched text is the affiliations, the comment, and the abstract,
/// lowercased and joined with single spaces.
pub fn detect_industry(affiliations: &[String], abstract_text: &str, comment: &str) -> String {
    let search_text = format!(
        "{} {} {}",
        affiliations.join(" ").to_lowercase(),
        comment.to_lowercase(),
        abstract_text.to_lowercase()
    );

    INDUSTRY_KEYWORDS
        .iter()
        .find(|entry| search_text.contains(entry.keyword))
        .map(IndustryKeyword::display_name)
        .unwrap_or_default()
}

/// Stable partition: industry papers first, then academic, each in input order.
///
/// Returns the reordered list and the number of industry papers at its head.
pub fn partition_by_source(papers: Vec<Paper>) -> (Vec<Paper>, usize) {
    let (mut industry, academic): (Vec<Paper>, Vec<Paper>) =
        papers.into_iter().partition(Paper::is_industry);
    let industry_count = industry.len();
    industry.extend(academic);
    (industry, industry_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(id: &str, source: &str) -> Paper {
        Paper {
            id: id.to_string(),
            industry_source: source.to_string(),
            ..Paper::default()
        }
    }

    #[test]
    fn test_keyword_in_affiliation() {
        let affs = vec!["Tencent Inc., Shenzhen".to_string()];
        assert_eq!(detect_industry(&affs, "", ""), "Tencent");
    }

    #[test]
    fn test_keyword_in_abstract_and_comment() {
        assert_eq!(
            detect_industry(&[], "Deployed on the Kuaishou short-video platform.", ""),
            "Kuaishou"
        );
        assert_eq!(
            detect_industry(&[], "", "Accepted at RecSys 2025; work done at Spotify"),
            "Spotify"
        );
    }

    #[test]
    fn test_alias_maps_to_parent_company() {
        assert_eq!(detect_industry(&[], "Experiments on Taobao logs", ""), "Alibaba");
        assert_eq!(detect_industry(&[], "an online A/B test on WeChat", ""), "Tencent");
        assert_eq!(detect_industry(&[], "YouTube watch-next", ""), "Google");
        assert_eq!(detect_industry(&["美团".to_string()], "", ""), "Meituan");
    }

    #[test]
    fn test_no_match_is_empty() {
        let affs = vec!["Tsinghua University".to_string()];
        assert_eq!(
            detect_industry(&affs, "We study sequential recommendation.", ""),
            ""
        );
    }

    #[test]
    fn test_first_keyword_in_table_order_wins() {
        // "google" precedes "amazon" in the table regardless of text position.
        let text = "Compared against Amazon and Google baselines";
        assert_eq!(detect_industry(&[], text, ""), "Google");
    }

    #[test]
    fn test_affiliations_are_searched_before_abstract_but_table_order_decides() {
        let affs = vec!["Amazon".to_string()];
        assert_eq!(detect_industry(&affs, "Alibaba dataset", ""), "Alibaba");
    }

    #[test]
    fn test_unmapped_keyword_is_title_cased() {
        assert_eq!(detect_industry(&[], "see x.com/handle", ""), "X.Com");
    }

    #[test]
    fn test_substring_false_positive_is_preserved() {
        // No word-boundary check: "meta" inside "metadata".
        assert_eq!(detect_industry(&[], "item metadata features", ""), "Meta");
    }

    #[test]
    fn test_every_keyword_is_lowercase() {
        for entry in INDUSTRY_KEYWORDS {
            assert_eq!(entry.keyword, entry.keyword.to_lowercase());
            assert_eq!(entry.keyword, entry.keyword.trim());
        }
    }

    #[test]
    fn test_partition_is_stable() {
        let input = vec![
            paper("A", "Google"),
            paper("B", ""),
            paper("C", "Meta"),
            paper("D", ""),
        ];
        let (ordered, industry) = partition_by_source(input);
        let ids: Vec<&str> = ordered.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "C", "B", "D"]);
        assert_eq!(industry, 2);
    }

    #[test]
    fn test_partition_all_academic() {
        let (ordered, industry) = partition_by_source(vec![paper("A", ""), paper("B", "")]);
        assert_eq!(industry, 0);
        assert_eq!(ordered[0].id, "A");
        assert_eq!(ordered[1].id, "B");
    }
}
