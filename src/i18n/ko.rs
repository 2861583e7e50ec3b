//! Korean translations

use std::collections::HashMap;

pub fn get_translations() -> HashMap<String, String> {
    let mut t = HashMap::new();

    // Datacenter grades
    t.insert("grade.S".into(), "S급 (최적)".into());
    t.insert("grade.A".into(), "A급 (우수)".into());
    t.insert("grade.B".into(), "B급 (양호)".into());
    t.insert("grade.C".into(), "C급 (보통)".into());
    t.insert("grade.D".into(), "D급 (부적합)".into());

    // Grid risk
    t.insert("grid.risk.low".into(), "낮음".into());
    t.insert("grid.risk.moderate".into(), "보통".into());
    t.insert("grid.risk.high".into(), "높음".into());

    // Grid actions
    t.insert("grid.action.high.expand".into(), "긴급 전력 인프라 확충 필요".into());
    t.insert("grid.action.high.interconnect".into(), "인근 지역 전력망 연계 강화 검토".into());
    t.insert("grid.action.high.downsize".into(), "데이터센터 규모 축소 권장".into());
    t.insert("grid.action.moderate.plan".into(), "중장기 전력 인프라 확충 계획 수립".into());
    t.insert("grid.action.moderate.peak_shift".into(), "피크 시간대 전력 사용 분산 전략 필요".into());
    t.insert("grid.action.moderate.renewables".into(), "재생에너지 연계 검토".into());
    t.insert("grid.action.low.accept".into(), "현재 전력 인프라로 수용 가능".into());
    t.insert("grid.action.low.phased".into(), "향후 확장성 고려한 계획적 개발 권장".into());

    // Policy insight templates
    t.insert(
        "policy.price_gap".into(),
        "전력단가 격차: 최고 {highest} {highest_price}, 최저 {lowest} {lowest_price} (kWh당 {gap}, {gap_percent}%)".into(),
    );
    t.insert("policy.top_investment".into(), "전력망 투자 우선순위 1위: {region} (우선순위 점수 {score})".into());
    t.insert(
        "policy.top_incentive".into(),
        "유치 인센티브 1순위: {region} ({grade}, 평균 대비 kWh당 {advantage} 저렴)".into(),
    );
    t.insert(
        "policy.recommended_count".into(),
        "후보 {total}개 지역 중 {count}개 지역이 권장 기준 충족, 최적 후보: {region}".into(),
    );
    t.insert("policy.no_recommended".into(), "현재 권장 기준을 충족하는 후보 지역 없음".into());
    t.insert("policy.static.modernize".into(), "전력망 현대화 투자를 통한 지역 간 효율성 격차 해소".into());
    t.insert("policy.static.tariff".into(), "데이터센터 유치를 위한 차등 전력요금제 도입 검토".into());
    t.insert("policy.static.infrastructure".into(), "AI 데이터센터 특화 전력 인프라 구축 지원".into());
    t.insert("policy.static.incentives".into(), "지역별 특성에 맞는 맞춤형 유치 인센티브 정책 수립".into());

    t
}
