use shared::ContestSettings;

pub struct Config {
    pub supabase_url: &'static str,
    pub supabase_anon_key: &'static str,
    pub production_redirect: &'static str,
}

impl Config {
    pub const fn new() -> Self {
        Self {
            supabase_url: match option_env!("SUPABASE_URL") {
                Some(url) => url,
                None => "https://your-project.supabase.co",
            },
            supabase_anon_key: match option_env!("SUPABASE_ANON_KEY") {
                Some(key) => key,
                None => "public-anon-key",
            },
            production_redirect: "https://ashendatigray.vercel.app/",
        }
    }
}

pub const CONFIG: Config = Config::new();
pub const SETTINGS: ContestSettings = ContestSettings::new();
