//! Built-in rule and route tables for the finance dashboard.
//!
//! Rule order is precedence. The broad `/` rule sits in the middle of the
//! table, so every rule registered after it is unreachable; the router logs
//! those at startup.

use crate::config::schema::{RouteConfig, RuleConfig};

const TCBS: &str = "https://apipubaws.tcbs.com.vn";
const DNSE: &str = "https://services.entrade.com.vn";
const SIGNALS: &str = "https://trading-api-dark-sunset-2092.fly.dev";
const RRG_CHARTS: &str = "https://thehaohcm.alwaysdata.net";

/// Dev-proxy table of the dashboard.
pub fn dashboard_rules() -> Vec<RuleConfig> {
    vec![
        RuleConfig::new("/tcanalysis/v1/evaluation", TCBS)
            .rewrite("^/tcanalysis/v1/evaluation", "/tcanalysis/v1/evaluation"),
        RuleConfig::new("/tcanalysis/v1/ticker", TCBS),
        RuleConfig::new("/stock-insight/v2/stock/bars-long-term", TCBS),
        RuleConfig::new("/api", "https://live-rates.com").rewrite("^/api", ""),
        RuleConfig::new("/cg", "https://api.coingecko.com").rewrite("^/cg", ""),
        RuleConfig::new("/world", SIGNALS).rewrite("^/world", ""),
        RuleConfig::new("/", DNSE),
        RuleConfig::new("/v4", "https://api-finfo.vndirect.com.vn"),
        RuleConfig::new("/dnse-user-service", DNSE),
        RuleConfig::new("/dnse-auth-service", DNSE),
        RuleConfig::new("/dnse-order-service", DNSE),
        RuleConfig::new("/getPotentialSymbols", SIGNALS),
        RuleConfig::new("/getPotentialCoins", SIGNALS),
        RuleConfig::new("/getPotentialForexPairs", SIGNALS),
        RuleConfig::new("/inputOTP", SIGNALS),
        RuleConfig::new("/userTrade", SIGNALS),
        RuleConfig::new("/getUserTrade", SIGNALS).rewrite("^/getUserTrade", "/getUserTrade"),
        RuleConfig::new("/updateTradingSignal", SIGNALS),
        RuleConfig::new("/api/news", "https://rsshub.rssforever.com")
            .rewrite("^/api/news", "telegram/channel/vnwallstreet"),
        RuleConfig::new("/ff_calendar_thisweek.json", "https://nfs.faireconomy.media")
            .rewrite("^/ff_calendar_thisweek.json", "/ff_calendar_thisweek.json")
            .response_header("Access-Control-Allow-Origin", "*"),
        RuleConfig::new("/goldprice", "https://sjc.com.vn").rewrite("^/goldprice", "/GoldPrice"),
        RuleConfig::new("/silverprice", "https://giabac.phuquygroup.vn")
            .rewrite("^/silverprice", "/PhuQuyPrice"),
        RuleConfig::new("/cryto_rrgchart", RRG_CHARTS)
            .rewrite("^/cryto_rrgchart", "/crypto_rrgchart.png"),
        RuleConfig::new("/vnstock_rrgchart", RRG_CHARTS)
            .rewrite("^/vnstock_rrgchart", "/vnstock_rrgchart.png"),
    ]
}

/// Navigation table of the dashboard. The wildcard comes last.
pub fn dashboard_routes() -> Vec<RouteConfig> {
    vec![
        RouteConfig::new("/", "Home"),
        RouteConfig::new("/login", "Login"),
        RouteConfig::new("/my-portfolio", "MyPortfolio").protected(),
        RouteConfig::new("/stock", "StockMarket"),
        RouteConfig::new("/stockvn", "StockVN"),
        RouteConfig::new("/crypto", "Crypto"),
        RouteConfig::new("/forex", "Forex"),
        RouteConfig::new("/commodities", "Commodities"),
        RouteConfig::new("/gold", "Gold"),
        RouteConfig::new("/silver", "Silver"),
        RouteConfig::new("/community", "Community").protected(),
        RouteConfig::new("/:pathMatch(.*)*", "NotFound"),
    ]
}
