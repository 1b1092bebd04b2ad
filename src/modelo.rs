use crate::erro::ErroPrevisao;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Normalização padrão (média/escala) ajustada durante o treinamento e
/// aplicada sem alteração na inferência.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalonadorPadrao {
    pub media: Vec<f64>,
    pub escala: Vec<f64>,
}

impl EscalonadorPadrao {
    pub fn transformar(&self, entrada: &[f64]) -> Result<Vec<f64>, ErroPrevisao> {
        if entrada.len() != self.media.len() || self.media.len() != self.escala.len() {
            return Err(ErroPrevisao::Modelo(format!(
                "escalonador espera {} features, recebeu {}",
                self.media.len(),
                entrada.len()
            )));
        }
        Ok(entrada
            .iter()
            .zip(self.media.iter().zip(self.escala.iter()))
            .map(|(x, (m, e))| (x - m) / e)
            .collect())
    }

    /// Transformação inversa para um alvo escalar (escalonador de y).
    pub fn inverter(&self, valor: f64) -> Result<f64, ErroPrevisao> {
        if self.media.len() != 1 || self.escala.len() != 1 {
            return Err(ErroPrevisao::Modelo(format!(
                "escalonador do alvo deve ter dimensão 1, tem {}",
                self.media.len()
            )));
        }
        Ok(valor * self.escala[0] + self.media[0])
    }
}

/// Parâmetros de uma máquina de vetores de suporte com kernel RBF, exportados
/// pelo treinamento. A função de decisão é a mesma para regressão (SVR) e
/// classificação (SVC); só muda a interpretação do resultado.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaquinaVetoresSuporte {
    pub vetores_suporte: Vec<Vec<f64>>,
    pub coeficientes_duais: Vec<f64>,
    pub intercepto: f64,
    pub gamma: f64,
}

impl MaquinaVetoresSuporte {
    fn decisao(&self, entrada: &[f64]) -> Result<f64, ErroPrevisao> {
        if self.vetores_suporte.len() != self.coeficientes_duais.len() {
            return Err(ErroPrevisao::Modelo(
                "modelo corrompido: vetores de suporte e coeficientes duais com tamanhos diferentes"
                    .to_string(),
            ));
        }

        let mut soma = self.intercepto;
        for (vetor, coef) in self.vetores_suporte.iter().zip(self.coeficientes_duais.iter()) {
            if vetor.len() != entrada.len() {
                return Err(ErroPrevisao::Modelo(format!(
                    "modelo espera {} features, recebeu {}",
                    vetor.len(),
                    entrada.len()
                )));
            }
            let distancia_quadrada: f64 = vetor
                .iter()
                .zip(entrada.iter())
                .map(|(v, x)| (v - x) * (v - x))
                .sum();
            soma += coef * (-self.gamma * distancia_quadrada).exp();
        }
        Ok(soma)
    }

    /// Predição contínua (regressor), ainda na escala normalizada do alvo.
    pub fn prever(&self, entrada: &[f64]) -> Result<f64, ErroPrevisao> {
        self.decisao(entrada)
    }

    /// Rótulo binário de anomalia (classificador).
    pub fn classificar(&self, entrada: &[f64]) -> Result<bool, ErroPrevisao> {
        Ok(self.decisao(entrada)? > 0.0)
    }
}

/// Conjunto de artefatos pré-treinados carregado uma única vez na subida do
/// processo e compartilhado somente-leitura entre as requisições.
#[derive(Debug, Clone)]
pub struct ArtefatosModelo {
    pub escalonador_x: EscalonadorPadrao,
    pub escalonador_y: EscalonadorPadrao,
    pub regressor: MaquinaVetoresSuporte,
    pub classificador: MaquinaVetoresSuporte,
}

impl ArtefatosModelo {
    pub fn carregar(diretorio: &Path) -> anyhow::Result<Self> {
        Ok(ArtefatosModelo {
            escalonador_x: carregar_json(&diretorio.join("scaler_x.json"))?,
            escalonador_y: carregar_json(&diretorio.join("scaler_y.json"))?,
            regressor: carregar_json(&diretorio.join("modelo_svr.json"))?,
            classificador: carregar_json(&diretorio.join("modelo_svm.json"))?,
        })
    }
}

fn carregar_json<T: serde::de::DeserializeOwned>(caminho: &Path) -> anyhow::Result<T> {
    let conteudo = fs::read_to_string(caminho)
        .with_context(|| format!("não foi possível ler {}", caminho.display()))?;
    serde_json::from_str(&conteudo)
        .with_context(|| format!("não foi possível parsear {}", caminho.display()))
}
