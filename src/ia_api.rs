use crate::erro::ErroIa;
use reqwest::Client;
use serde_json::json;

const URL_COMPLETIONS: &str = "https://api.groq.com/openai/v1/chat/completions";
const MODELO_LLM: &str = "llama3-8b-8192";

/// Cliente do modelo de linguagem hospedado. Construído uma única vez na
/// subida do processo e injetado nos handlers; nunca re-instanciado por
/// requisição.
///
/// # Exemplo de uso:
/// ```rust,ignore
/// let resposta = cliente_ia.perguntar("Qual é a previsão para hoje?").await?;
/// println!("{}", resposta);
/// ```
#[derive(Clone)]
pub struct ClienteIa {
    http: Client,
    api_key: String,
    persona: String,
}

impl ClienteIa {
    pub fn new(http: Client, api_key: String, persona: String) -> Self {
        ClienteIa {
            http,
            api_key,
            persona,
        }
    }

    /// Envia um prompt de texto ao modelo, precedido da persona fixa do
    /// projeto, e devolve o texto da resposta. Uma tentativa por chamada,
    /// sem retry.
    pub async fn perguntar(&self, prompt: &str) -> Result<String, ErroIa> {
        let corpo = json!({
            "model": MODELO_LLM,
            "messages": [
                { "role": "system", "content": self.persona },
                { "role": "user", "content": prompt }
            ]
        });

        let resposta = self
            .http
            .post(URL_COMPLETIONS)
            .bearer_auth(&self.api_key)
            .json(&corpo)
            .send()
            .await?
            .error_for_status()?;

        let resposta_json: serde_json::Value = resposta.json().await?;

        resposta_json["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or(ErroIa::RespostaInvalida)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extrai_o_texto_do_formato_de_resposta() {
        let resposta_json: serde_json::Value = serde_json::from_str(
            r#"{"choices": [{"message": {"role": "assistant", "content": "olá"}}]}"#,
        )
        .unwrap();
        assert_eq!(
            resposta_json["choices"][0]["message"]["content"].as_str(),
            Some("olá")
        );
    }
}
