use crate::erro::ErroPrevisao;
use crate::modelo::ArtefatosModelo;
use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

/// Pedido já validado: data de referência, contagem de sensores e horizonte
/// em dias dentro de [1, 365].
#[derive(Debug, Clone, PartialEq)]
pub struct PedidoPrevisao {
    pub sensor_count: f64,
    pub data_inicial: NaiveDate,
    pub dias: u32,
}

pub const DIAS_PADRAO: u32 = 30;
pub const DIAS_MAXIMO: u32 = 365;

impl PedidoPrevisao {
    pub fn novo(sensor_count: f64, data: &str, dias: Option<i64>) -> Result<Self, ErroPrevisao> {
        if !sensor_count.is_finite() {
            return Err(ErroPrevisao::Validacao(
                "sensor_count deve ser numérico".to_string(),
            ));
        }
        if sensor_count < 0.0 {
            return Err(ErroPrevisao::Validacao(
                "sensor_count não pode ser negativo".to_string(),
            ));
        }

        let data_inicial = NaiveDate::parse_from_str(data.trim(), "%Y-%m-%d")
            .map_err(|_| ErroPrevisao::Validacao(format!("data inválida: '{}'", data)))?;

        let dias = dias.unwrap_or(i64::from(DIAS_PADRAO));
        if dias < 1 || dias > i64::from(DIAS_MAXIMO) {
            return Err(ErroPrevisao::Validacao(format!(
                "days deve estar entre 1 e {}, recebeu {}",
                DIAS_MAXIMO, dias
            )));
        }

        Ok(PedidoPrevisao {
            sensor_count,
            data_inicial,
            dias: dias as u32,
        })
    }
}

/// Política de alerta e de formato da resposta, resolvida na configuração.
#[derive(Debug, Clone, Copy)]
pub struct PoliticaAlerta {
    pub limiar_litros: f64,
    pub incluir_anomalia: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrevisaoDiaria {
    #[serde(rename = "date")]
    pub data: NaiveDate,
    #[serde(rename = "predicted_volume_liters")]
    pub volume_previsto_litros: f64,
    #[serde(rename = "is_anomaly", skip_serializing_if = "Option::is_none")]
    pub anomalia: Option<bool>,
}

/// Evento efêmero: só existe como carga do envio de notificação.
#[derive(Debug, Clone, PartialEq)]
pub struct Alerta {
    pub data: NaiveDate,
    pub sensor_count: f64,
    pub volume_previsto_litros: f64,
    pub limiar_excedido: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultadoPrevisao {
    pub previsoes: Vec<PrevisaoDiaria>,
    pub alertas: Vec<Alerta>,
}

/// Vetor de features de um dia previsto: (sensores, dia da semana com
/// segunda = 0, mês, dia do ano).
pub fn construir_features(data: NaiveDate, sensor_count: f64) -> [f64; 4] {
    [
        sensor_count,
        f64::from(data.weekday().num_days_from_monday()),
        f64::from(data.month()),
        f64::from(data.ordinal()),
    ]
}

pub(crate) fn arredondar_duas_casas(num: f64) -> f64 {
    (num * 100.0).round() / 100.0
}

/// Gera a sequência de previsões diárias em ordem ascendente de data, mais os
/// alertas de todo dia cuja predição atinge ou ultrapassa o limiar. O envio
/// das notificações fica a cargo do chamador; esta função não tem efeitos
/// colaterais.
pub fn gerar_previsao(
    pedido: &PedidoPrevisao,
    artefatos: &ArtefatosModelo,
    politica: &PoliticaAlerta,
) -> Result<ResultadoPrevisao, ErroPrevisao> {
    let mut previsoes = Vec::with_capacity(pedido.dias as usize);
    let mut alertas = Vec::new();

    for deslocamento in 0..pedido.dias {
        let data = pedido
            .data_inicial
            .checked_add_days(Days::new(u64::from(deslocamento)))
            .ok_or_else(|| {
                ErroPrevisao::Validacao("data fora do intervalo suportado".to_string())
            })?;

        let features = construir_features(data, pedido.sensor_count);
        let features_normalizadas = artefatos.escalonador_x.transformar(&features)?;

        let volume_escalado = artefatos.regressor.prever(&features_normalizadas)?;
        let volume_litros =
            arredondar_duas_casas(artefatos.escalonador_y.inverter(volume_escalado)?);

        let anomalia = if politica.incluir_anomalia {
            Some(artefatos.classificador.classificar(&features_normalizadas)?)
        } else {
            None
        };

        previsoes.push(PrevisaoDiaria {
            data,
            volume_previsto_litros: volume_litros,
            anomalia,
        });

        if volume_litros >= politica.limiar_litros {
            alertas.push(Alerta {
                data,
                sensor_count: pedido.sensor_count,
                volume_previsto_litros: volume_litros,
                limiar_excedido: true,
            });
        }
    }

    Ok(ResultadoPrevisao { previsoes, alertas })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modelo::{EscalonadorPadrao, MaquinaVetoresSuporte};

    // Artefatos com escalonadores identidade e SVMs sem vetores de suporte:
    // o regressor devolve sempre `volume` e o classificador sempre `anomalia`.
    fn artefatos_stub(volume: f64, anomalia: bool) -> ArtefatosModelo {
        let constante = |intercepto: f64| MaquinaVetoresSuporte {
            vetores_suporte: vec![],
            coeficientes_duais: vec![],
            intercepto,
            gamma: 0.25,
        };
        ArtefatosModelo {
            escalonador_x: EscalonadorPadrao {
                media: vec![0.0; 4],
                escala: vec![1.0; 4],
            },
            escalonador_y: EscalonadorPadrao {
                media: vec![0.0],
                escala: vec![1.0],
            },
            regressor: constante(volume),
            classificador: constante(if anomalia { 1.0 } else { -1.0 }),
        }
    }

    fn politica(limiar: f64) -> PoliticaAlerta {
        PoliticaAlerta {
            limiar_litros: limiar,
            incluir_anomalia: true,
        }
    }

    fn pedido(dias: u32) -> PedidoPrevisao {
        PedidoPrevisao {
            sensor_count: 12.0,
            data_inicial: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            dias,
        }
    }

    #[test]
    fn gera_uma_previsao_por_dia_em_ordem_ascendente() {
        let resultado =
            gerar_previsao(&pedido(30), &artefatos_stub(1000.0, false), &politica(23000.0))
                .unwrap();

        assert_eq!(resultado.previsoes.len(), 30);
        for (i, previsao) in resultado.previsoes.iter().enumerate() {
            let esperada = NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .checked_add_days(Days::new(i as u64))
                .unwrap();
            assert_eq!(previsao.data, esperada);
        }
    }

    #[test]
    fn horizonte_de_um_dia_preve_apenas_a_data_de_referencia() {
        let resultado =
            gerar_previsao(&pedido(1), &artefatos_stub(1000.0, false), &politica(23000.0))
                .unwrap();
        assert_eq!(resultado.previsoes.len(), 1);
        assert_eq!(
            resultado.previsoes[0].data,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
    }

    #[test]
    fn horizonte_maximo_nao_passa_de_364_dias_apos_a_referencia() {
        let resultado =
            gerar_previsao(&pedido(365), &artefatos_stub(1000.0, false), &politica(23000.0))
                .unwrap();
        assert_eq!(resultado.previsoes.len(), 365);
        assert_eq!(
            resultado.previsoes.last().unwrap().data,
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .checked_add_days(Days::new(364))
                .unwrap()
        );
    }

    #[test]
    fn rejeita_horizonte_fora_do_intervalo() {
        for dias in [0i64, 400] {
            let erro = PedidoPrevisao::novo(12.0, "2024-01-01", Some(dias)).unwrap_err();
            assert!(matches!(erro, ErroPrevisao::Validacao(_)), "dias = {}", dias);
        }
    }

    #[test]
    fn horizonte_ausente_usa_30_dias() {
        let pedido = PedidoPrevisao::novo(12.0, "2024-01-01", None).unwrap();
        assert_eq!(pedido.dias, 30);
    }

    #[test]
    fn rejeita_data_invalida_sem_panico() {
        let erro = PedidoPrevisao::novo(12.0, "not-a-date", None).unwrap_err();
        assert!(matches!(erro, ErroPrevisao::Validacao(_)));
    }

    #[test]
    fn rejeita_sensor_count_negativo_ou_nao_numerico() {
        assert!(matches!(
            PedidoPrevisao::novo(-1.0, "2024-01-01", None),
            Err(ErroPrevisao::Validacao(_))
        ));
        assert!(matches!(
            PedidoPrevisao::novo(f64::NAN, "2024-01-01", None),
            Err(ErroPrevisao::Validacao(_))
        ));
    }

    #[test]
    fn exemplo_de_tres_dias_a_partir_de_2024_01_01() {
        let pedido = PedidoPrevisao::novo(12.0, "2024-01-01", Some(3)).unwrap();
        let resultado =
            gerar_previsao(&pedido, &artefatos_stub(1234.567, false), &politica(23000.0)).unwrap();

        let datas: Vec<String> = resultado
            .previsoes
            .iter()
            .map(|p| p.data.to_string())
            .collect();
        assert_eq!(datas, vec!["2024-01-01", "2024-01-02", "2024-01-03"]);
        for previsao in &resultado.previsoes {
            assert_eq!(previsao.volume_previsto_litros, 1234.57);
        }
    }

    #[test]
    fn duas_execucoes_identicas_produzem_o_mesmo_resultado() {
        let artefatos = artefatos_stub(4321.0, true);
        let primeira = gerar_previsao(&pedido(30), &artefatos, &politica(23000.0)).unwrap();
        let segunda = gerar_previsao(&pedido(30), &artefatos, &politica(23000.0)).unwrap();
        assert_eq!(primeira, segunda);
    }

    #[test]
    fn volume_no_limiar_dispara_um_alerta_na_data_de_referencia() {
        let resultado =
            gerar_previsao(&pedido(1), &artefatos_stub(25000.0, false), &politica(23000.0))
                .unwrap();

        assert_eq!(resultado.alertas.len(), 1);
        let alerta = &resultado.alertas[0];
        assert_eq!(alerta.data, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(alerta.volume_previsto_litros, 25000.0);
        assert_eq!(alerta.sensor_count, 12.0);
        assert!(alerta.limiar_excedido);
    }

    #[test]
    fn volume_abaixo_do_limiar_nao_gera_alertas() {
        let resultado =
            gerar_previsao(&pedido(30), &artefatos_stub(15000.0, false), &politica(23000.0))
                .unwrap();
        assert!(resultado.alertas.is_empty());
    }

    #[test]
    fn cada_dia_acima_do_limiar_gera_o_proprio_alerta() {
        let resultado =
            gerar_previsao(&pedido(5), &artefatos_stub(25000.0, false), &politica(23000.0))
                .unwrap();
        assert_eq!(resultado.alertas.len(), 5);
    }

    #[test]
    fn anomalia_segue_a_politica_configurada() {
        let artefatos = artefatos_stub(1000.0, true);
        let com_flag = gerar_previsao(&pedido(1), &artefatos, &politica(23000.0)).unwrap();
        assert_eq!(com_flag.previsoes[0].anomalia, Some(true));

        let sem_flag = gerar_previsao(
            &pedido(1),
            &artefatos,
            &PoliticaAlerta {
                limiar_litros: 23000.0,
                incluir_anomalia: false,
            },
        )
        .unwrap();
        assert_eq!(sem_flag.previsoes[0].anomalia, None);
    }

    #[test]
    fn anomalia_ausente_fica_fora_do_json() {
        let previsao = PrevisaoDiaria {
            data: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            volume_previsto_litros: 100.0,
            anomalia: None,
        };
        let json = serde_json::to_value(&previsao).unwrap();
        assert!(json.get("is_anomaly").is_none());
        assert_eq!(json["date"], "2024-01-01");
        assert_eq!(json["predicted_volume_liters"], 100.0);
    }

    #[test]
    fn features_seguem_o_calendario() {
        // 2024-01-01 é uma segunda-feira
        let inicio_do_ano = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(construir_features(inicio_do_ano, 12.0), [12.0, 0.0, 1.0, 1.0]);

        // 2024 é bissexto: 31/12 é o dia 366 e cai numa terça-feira
        let fim_do_ano = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(construir_features(fim_do_ano, 7.5), [7.5, 1.0, 12.0, 366.0]);
    }

    #[test]
    fn erro_de_modelo_e_propagado() {
        let mut artefatos = artefatos_stub(1000.0, false);
        artefatos.escalonador_x.media = vec![0.0; 3];
        artefatos.escalonador_x.escala = vec![1.0; 3];

        let erro = gerar_previsao(&pedido(1), &artefatos, &politica(23000.0)).unwrap_err();
        assert!(matches!(erro, ErroPrevisao::Modelo(_)));
    }

    #[test]
    fn arredonda_para_duas_casas() {
        assert_eq!(arredondar_duas_casas(123.456), 123.46);
        assert_eq!(arredondar_duas_casas(123.454), 123.45);
        assert_eq!(arredondar_duas_casas(20000.0), 20000.0);
    }
}
