use crate::CoachEnv;

pub trait ModuleClient: Clone + Send + Sync + 'static {
    const NAME: &'static str;
    type Client;

    fn validate_env(env: &CoachEnv) -> bool;
    /// `None` when a required setting is missing; callers treat that as "not configured".
    fn from_env(env: &CoachEnv) -> Option<Self>;

    fn get_client(&self) -> &Self::Client;
}

#[macro_export]
macro_rules! define_module_client {
    {
        (struct $struct_name:ident, $client_name:expr)
        client_type: $client_type:ty,
        env: [ $( $env_var:literal ),* ],
        setup: |$env:ident| $setup_logic:expr
    } => {
        #[derive(Clone)]
        pub struct $struct_name {
            client: std::sync::Arc<$client_type>,
        }

        impl ::coach_common::ModuleClient for $struct_name {
            const NAME: &'static str = $client_name;
            type Client = std::sync::Arc<$client_type>;

            fn validate_env(env: &::coach_common::CoachEnv) -> bool {
                use ::coach_common::EnvVars;

                const ENV_VARS: &'static [&'static str] = &[ $( $env_var ),* ];
                let missing_vars: Vec<&'static str> = ENV_VARS.iter().cloned().filter(|var| env.get_env_var(var).is_none()).collect();

                if missing_vars.is_empty() {
                    return true;
                }

                let vars_str = missing_vars.join(", ");
                tracing::warn!("[Client: {}] Required settings are not configured: [{}]", $client_name, &vars_str);
                false
            }

            fn from_env(env: &::coach_common::CoachEnv) -> Option<Self> {
                if !Self::validate_env(env) {
                    return None;
                }

                let $env = env;
                let client_instance: $client_type = $setup_logic;
                Some(Self {
                    client: std::sync::Arc::new(client_instance),
                })
            }

            fn get_client(&self) -> &Self::Client {
                &self.client
            }
        }
    }
}
