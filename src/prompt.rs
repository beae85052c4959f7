// =============================================================================
// Report Text — narrative prompt and market summary
// =============================================================================
//
// The narrative collaborator receives one plain-text prompt embedding every
// computed indicator, the projected ranges, the sentiment scores and the most
// recent headlines.
// Its answer is used verbatim; nothing here parses it.
// =============================================================================

use std::fmt::Write;

use chrono::NaiveDate;

use crate::indicators::rsi::interpret_rsi;
use crate::indicators::IndicatorBundle;
use crate::providers::NewsItem;
use crate::sentiment::Sentiment;
use crate::types::PriceTargets;

/// Build the narrative prompt for `asset`.
pub fn build_prompt(
    asset: &str,
    bundle: &IndicatorBundle,
    targets: &PriceTargets,
    sentiment: &Sentiment,
    news: &[NewsItem],
    headline_count: usize,
) -> String {
    let mut p = String::with_capacity(2048);

    // Writing to a String cannot fail.
    let _ = writeln!(
        p,
        "You are a quantitative analyst covering digital assets. Write a strategic \
         market analysis of {asset} grounded only in the data below."
    );
    p.push('\n');

    p.push_str("PRICE ACTION\n");
    let _ = writeln!(p, "- Current price: {:.2} USD", bundle.current_price);
    let _ = writeln!(p, "- 24h change: {:.2}%", bundle.price_change_24h);
    let _ = writeln!(
        p,
        "- MA20 / MA50 / MA200: {:.2} / {:.2} / {:.2}",
        bundle.ma20, bundle.ma50, bundle.ma200
    );
    p.push('\n');

    p.push_str("MOMENTUM\n");
    let _ = writeln!(p, "- RSI(14): {:.2} ({})", bundle.rsi, interpret_rsi(bundle.rsi));
    let _ = writeln!(
        p,
        "- MACD: value {:.4}, signal {:.4}, histogram {:.4} ({})",
        bundle.macd.value, bundle.macd.signal, bundle.macd.histogram, bundle.macd.interpretation
    );
    let _ = writeln!(p, "- Stochastic RSI(14): {:.2}", bundle.stoch_rsi);
    let _ = writeln!(
        p,
        "- Volume vs 20-day mean: {:.2}x, OBV trend {}",
        bundle.volume_change, bundle.obv_trend
    );
    p.push('\n');

    p.push_str("MARKET STRUCTURE\n");
    let _ = writeln!(p, "- Phase: {}", bundle.market_phase);
    let _ = writeln!(p, "- Annualised volatility: {:.2}%", bundle.volatility);
    let _ = writeln!(p, "- Support: {:.2}", bundle.support);
    let _ = writeln!(p, "- Resistance: {:.2}", bundle.resistance);
    p.push('\n');

    p.push_str("PROJECTED RANGES\n");
    for (label, target) in targets.horizons() {
        let _ = writeln!(
            p,
            "- {label}: {} (confidence {:.0}%)",
            target.range, target.confidence
        );
    }
    p.push('\n');

    p.push_str("SENTIMENT\n");
    let _ = writeln!(p, "- News sentiment score: {:.0}%", sentiment.news_score);
    let _ = writeln!(p, "- Market mood: {}", sentiment.market_mood);
    if news.is_empty() {
        p.push_str("- No recent headlines\n");
    } else {
        p.push_str("- Recent headlines:\n");
        for item in news.iter().take(headline_count) {
            let _ = writeln!(p, "  * {} ({})", item.title, item.sentiment);
        }
    }
    p.push('\n');

    p.push_str(
        "Cover, in order: a two or three sentence summary naming the phase and key \
         levels; the technical, momentum, volume and sentiment signals; entry zones, \
         stop loss and price targets with concrete dollar levels; and a suitable \
         trading timeframe. Use plain text without markdown.\n",
    );

    p
}

/// One-paragraph summary of the indicator bundle.
pub fn market_summary(asset: &str, bundle: &IndicatorBundle, date: NaiveDate) -> String {
    let price = bundle.current_price;
    let position = if price > bundle.ma50 { "above" } else { "below" };
    let outlook = if price > bundle.ma50 && price > bundle.ma200 {
        "bullish momentum"
    } else {
        "potential trend reversal"
    };

    format!(
        "{} as of {} is in a {} with {} momentum and a {}. Price is {} most moving \
         averages, indicating {}.",
        capitalize(asset),
        date.format("%Y-%m-%d"),
        bundle.market_phase.to_string().to_lowercase(),
        interpret_rsi(bundle.rsi).to_lowercase(),
        bundle.macd.interpretation.to_lowercase(),
        position,
        outlook,
    )
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::macd::MacdReading;
    use crate::indicators::volume::ObvTrend;
    use crate::indicators::MarketPhase;
    use crate::providers::NewsSentiment;
    use crate::projection::ProjectionEngine;
    use crate::sentiment::MarketMood;

    fn bundle() -> IndicatorBundle {
        IndicatorBundle {
            current_price: 200.0,
            price_change_24h: 0.5,
            rsi: 100.0,
            macd: MacdReading {
                value: 7.0,
                signal: 7.0,
                histogram: 0.0,
                interpretation: "Neutral or fading momentum (upward trend), potential trend reversal"
                    .into(),
            },
            stoch_rsi: 50.0,
            ma20: 190.0,
            ma50: 175.0,
            ma200: 150.0,
            volume_change: 1.0,
            obv_trend: ObvTrend::Bullish,
            market_phase: MarketPhase::BullMarket,
            volatility: 3.2,
            support: 125.0,
            resistance: 175.0,
        }
    }

    fn news(n: usize) -> Vec<NewsItem> {
        (0..n)
            .map(|i| NewsItem {
                title: format!("headline {i}"),
                sentiment: NewsSentiment::Positive,
            })
            .collect()
    }

    #[test]
    fn prompt_embeds_indicators_and_first_headlines() {
        let sentiment = Sentiment {
            news_score: 80.0,
            social_score: 50.0,
            market_mood: MarketMood::Bullish,
        };
        let prompt = build_prompt(
            "bitcoin",
            &bundle(),
            &ProjectionEngine::project(200.0, 3.2),
            &sentiment,
            &news(5),
            3,
        );

        assert!(prompt.contains("bitcoin"));
        assert!(prompt.contains("Current price: 200.00 USD"));
        assert!(prompt.contains("RSI(14): 100.00"));
        assert!(prompt.contains("Phase: Bull Market"));
        assert!(prompt.contains("Market mood: Bullish"));
        assert!(prompt.contains("24H: $"));
        assert!(prompt.contains("30D: $"));
        assert!(prompt.contains("headline 0 (positive)"));
        assert!(prompt.contains("headline 2"));
        assert!(!prompt.contains("headline 3"));
    }

    #[test]
    fn prompt_without_headlines() {
        let prompt = build_prompt(
            "eth",
            &bundle(),
            &PriceTargets::unavailable(),
            &Sentiment::neutral(),
            &[],
            3,
        );
        assert!(prompt.contains("No recent headlines"));
        assert!(prompt.contains("- 7D: N/A (confidence 0%)"));
    }

    #[test]
    fn summary_text() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let summary = market_summary("bitcoin", &bundle(), date);
        assert_eq!(
            summary,
            "Bitcoin as of 2026-03-14 is in a bull market with overbought - consider taking \
             profits momentum and a neutral or fading momentum (upward trend), potential trend \
             reversal. Price is above most moving averages, indicating bullish momentum."
        );
    }

    #[test]
    fn summary_below_averages() {
        let mut b = bundle();
        b.current_price = 160.0;
        b.market_phase = MarketPhase::Correction;
        let date = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        let summary = market_summary("eth", &b, date);
        assert!(summary.starts_with("Eth as of 2026-01-02 is in a correction"));
        assert!(summary.ends_with("Price is below most moving averages, indicating potential trend reversal."));
    }
}
